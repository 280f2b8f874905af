//! Application error type and its HTTP mapping.
//!
//! Errors are converted to JSON bodies of the form
//! `{"error": <code>, "message": <text>}`. Database details are logged,
//! never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("No route for {0}")]
    NotFound(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl AppError {
    /// Status code and machine-readable error code for this error
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Timeout(_) | AppError::Database(DbError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "timeout")
            }
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::NotFound(_) | AppError::Timeout(_) => self.to_string(),
            AppError::Database(DbError::Timeout(_)) => {
                tracing::error!(error = %self, "Database timed out");
                "the database did not respond in time".to_string()
            }
            _ => {
                tracing::error!("Database error: {:?}", self);
                "an internal error occurred".to_string()
            }
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
