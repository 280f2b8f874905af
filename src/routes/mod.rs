//! HTTP route handlers.
//!
//! Routes are grouped by their Cache-Control policy. The student listing is
//! live data and marked `no-store`; the greeting and health check are `no-cache`.
//!
//! Every request passes through the request ID middleware (outermost, for log
//! correlation) and the request timeout middleware.

pub mod health;
pub mod home;
pub mod students;

use std::time::Duration;

use axum::{
    http::Uri,
    middleware,
    routing::get,
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{CACHE_CONTROL_NO_CACHE, CACHE_CONTROL_STUDENTS};
use crate::error::AppError;
use crate::middleware::{request_id_layer, timeout_layer};
use crate::state::AppState;

/// Creates the Axum router with all routes, cache headers and middleware.
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.http.request_timeout_seconds);

    let student_routes = Router::new()
        .route("/students", get(students::list))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STUDENTS),
        ));

    let uncached_routes = Router::new()
        .route("/", get(home::index))
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_CACHE),
        ));

    Router::new()
        .merge(student_routes)
        .merge(uncached_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(request_timeout, timeout_layer))
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
