//! Liveness endpoint.

/// `GET /health`: answers `ok` whenever the process can serve HTTP.
/// The database is not consulted.
pub async fn health() -> &'static str {
    "ok"
}
