//! Root greeting handler.

/// Fixed greeting. Never touches the database.
pub async fn index() -> &'static str {
    "Hello, World!"
}
