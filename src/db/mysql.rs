//! MySQL-backed student store.
//!
//! With `pool_size = 0` every call opens its own connection and closes it
//! before returning. With `pool_size > 0` a bounded `MySqlPool` hands out
//! connections that go back to the pool when the call finishes. The pool is
//! created lazily, so startup never waits on the database.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection};

use super::{DbError, Student, StudentStore, LIST_STUDENTS_SQL};
use crate::config::DatabaseConfig;

/// Student store talking to MySQL through sqlx.
#[derive(Debug, Clone)]
pub struct MySqlStudentStore {
    options: MySqlConnectOptions,
    pool: Option<MySqlPool>,
    connect_timeout: Duration,
}

impl MySqlStudentStore {
    /// Build a store from configuration. Does not touch the network.
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = connect_options(config);
        let connect_timeout = Duration::from_secs(config.connect_timeout_seconds);

        let pool = config.is_pooled().then(|| {
            MySqlPoolOptions::new()
                .max_connections(config.pool_size)
                .acquire_timeout(connect_timeout)
                .connect_lazy_with(options.clone())
        });

        Self {
            options,
            pool,
            connect_timeout,
        }
    }

    /// Whether this store hands out pooled connections
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    async fn list_unpooled(&self) -> Result<Vec<Student>, DbError> {
        let mut conn = tokio::time::timeout(self.connect_timeout, self.options.connect())
            .await
            .map_err(|_| DbError::Timeout(self.connect_timeout.as_secs()))?
            .map_err(DbError::Connect)?;

        let result = sqlx::query_as::<_, Student>(LIST_STUDENTS_SQL)
            .fetch_all(&mut conn)
            .await;

        // Drop releases the socket even when the close handshake fails.
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Error closing database connection");
        }

        result.map_err(DbError::Query)
    }

    async fn list_pooled(&self, pool: &MySqlPool) -> Result<Vec<Student>, DbError> {
        let mut conn = pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut => DbError::Timeout(self.connect_timeout.as_secs()),
            other => DbError::Connect(other),
        })?;

        sqlx::query_as::<_, Student>(LIST_STUDENTS_SQL)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::Query)
    }
}

#[async_trait]
impl StudentStore for MySqlStudentStore {
    async fn list_students(&self) -> Result<Vec<Student>, DbError> {
        let students = match &self.pool {
            Some(pool) => self.list_pooled(pool).await?,
            None => self.list_unpooled().await?,
        };
        tracing::debug!(count = students.len(), "Fetched students");
        Ok(students)
    }
}

fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .charset(&config.charset)
}
