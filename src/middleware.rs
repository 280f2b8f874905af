//! Request middleware: request IDs for log correlation and the request timeout.
//!
//! `request_id_layer` generates a UUID v4 for each incoming request and creates
//! a tracing span that wraps the entire request lifecycle. `timeout_layer`
//! bounds how long any request may run.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;

/// Correlation id assigned to every request, readable by handlers as an extension.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Response header carrying the request id back to the client.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Outermost layer. Tags the request with a fresh [`RequestId`], runs the rest
/// of the stack inside a `request` span, then logs status and latency and
/// echoes the id in [`REQUEST_ID_HEADER`].
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4());
    let span = tracing::info_span!(
        "request",
        request_id = %id.0,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );
    request.extensions_mut().insert(id);

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    span.record("duration_ms", elapsed_ms);
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "Request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&id.0.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Middleware that answers 504 once a request has run for longer than the limit.
///
/// The handler future is dropped on expiry, which releases any connection it holds.
pub async fn timeout_layer(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_secs = limit.as_secs(), "Request timed out");
            AppError::Timeout(limit.as_secs()).into_response()
        }
    }
}
