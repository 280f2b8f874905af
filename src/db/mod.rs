//! Database layer - the student record, the store trait and its MySQL backend.
//!
//! Handlers only see [`StudentStore`]; the MySQL implementation decides whether
//! a request gets a fresh connection or a pooled one.

mod mysql;

use async_trait::async_trait;
use serde::Serialize;

pub use mysql::MySqlStudentStore;

/// The one query this service runs.
pub const LIST_STUDENTS_SQL: &str = "SELECT id, name FROM student";

/// A row of the `student` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("database did not respond within {0} seconds")]
    Timeout(u64),
}

/// Read access to the student table.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// All rows in the store's natural scan order.
    async fn list_students(&self) -> Result<Vec<Student>, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_serializes_exactly_id_and_name() {
        let student = Student {
            id: 1,
            name: "Alice".to_string(),
        };
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value, serde_json::json!({"id": 1, "name": "Alice"}));
    }

    #[test]
    fn query_selects_both_columns() {
        assert_eq!(LIST_STUDENTS_SQL, "SELECT id, name FROM student");
    }
}
