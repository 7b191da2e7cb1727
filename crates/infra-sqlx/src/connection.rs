// sqlx DatabaseConnection
// Manual-commit mode is an open BEGIN on the single underlying connection

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Connection, Executor, Row as _};
use std::sync::Arc;
use std::time::Duration;
use suno_core::domain::SqlValue;
use suno_core::port::{DatabaseConnection, DriverError, PreparedStatement, Row, Statement};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Inner {
    // None once closed
    conn: Option<AnyConnection>,
    auto_commit: bool,
}

type Shared = Arc<Mutex<Inner>>;

/// One live `AnyConnection` shared by the manager and its statements
pub struct SqlxConnection {
    inner: Shared,
}

impl SqlxConnection {
    pub fn new(conn: AnyConnection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                conn: Some(conn),
                auto_commit: true,
            })),
        }
    }
}

fn open_conn<'a>(guard: &'a mut MutexGuard<'_, Inner>) -> Result<&'a mut AnyConnection, DriverError> {
    guard
        .conn
        .as_mut()
        .ok_or_else(|| DriverError::new("connection is closed"))
}

async fn run_control(conn: &mut AnyConnection, sql: &'static str) -> Result<(), DriverError> {
    sqlx::query(sql)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error(sql, e))?;
    Ok(())
}

#[async_trait]
impl DatabaseConnection for SqlxConnection {
    async fn create_statement(&self) -> Result<Box<dyn Statement>, DriverError> {
        let mut guard = self.inner.lock().await;
        open_conn(&mut guard)?;
        Ok(Box::new(SqlxStatement {
            inner: self.inner.clone(),
        }))
    }

    async fn prepare_statement(
        &self,
        sql: &str,
    ) -> Result<Box<dyn PreparedStatement>, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        // Let the server parse the text now so bad SQL fails here
        (&mut *conn)
            .prepare(sql)
            .await
            .map_err(|e| map_sqlx_error("Failed to prepare statement", e))?;

        Ok(Box::new(SqlxPreparedStatement {
            sql: sql.to_string(),
            params: Vec::new(),
            inner: self.inner.clone(),
        }))
    }

    async fn is_valid(&self, timeout: Duration) -> Result<bool, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        match tokio::time::timeout(timeout, conn.ping()).await {
            Ok(Ok(())) => Ok(true),
            Ok(Err(e)) => {
                debug!(error = %e, "Ping failed");
                Ok(false)
            }
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Ping timed out");
                Ok(false)
            }
        }
    }

    async fn set_auto_commit(&self, auto_commit: bool) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        open_conn(&mut guard)?;
        if guard.auto_commit == auto_commit {
            return Ok(());
        }

        let conn = open_conn(&mut guard)?;
        // Switching back to autocommit commits pending work
        let sql = if auto_commit { "COMMIT" } else { "BEGIN" };
        run_control(conn, sql).await?;
        guard.auto_commit = auto_commit;
        Ok(())
    }

    async fn commit(&self) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        if guard.auto_commit {
            return Err(DriverError::new("Cannot commit: no active transaction"));
        }

        let conn = open_conn(&mut guard)?;
        run_control(conn, "COMMIT").await?;
        // Still in manual mode: the next unit of work starts right away
        run_control(conn, "BEGIN").await
    }

    async fn rollback(&self) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        if guard.auto_commit {
            return Err(DriverError::new("Cannot roll back: no active transaction"));
        }

        let conn = open_conn(&mut guard)?;
        run_control(conn, "ROLLBACK").await?;
        run_control(conn, "BEGIN").await
    }

    async fn close(&self) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        let Some(conn) = guard.conn.take() else {
            return Ok(());
        };
        guard.auto_commit = true;

        conn.close()
            .await
            .map_err(|e| map_sqlx_error("Failed to close connection", e))
    }
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Bytes(v) => query.bind(v.clone()),
    }
}

// Column types are probed in order; NULL of any type decodes as Null
fn decode_row(row: &AnyRow) -> Result<Row, DriverError> {
    (0..row.len())
        .map(|idx| {
            if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
                return Ok(v.into());
            }
            if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
                return Ok(v.into());
            }
            if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
                return Ok(v.into());
            }
            if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
                return Ok(v.into());
            }
            row.try_get::<Option<Vec<u8>>, _>(idx)
                .map(SqlValue::from)
                .map_err(|e| map_sqlx_error("Failed to decode column", e))
        })
        .collect()
}

struct SqlxStatement {
    inner: Shared,
}

#[async_trait]
impl Statement for SqlxStatement {
    async fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        let result = sqlx::query(sql)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to execute statement", e))?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        let rows = sqlx::query(sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to run query", e))?;
        rows.iter().map(decode_row).collect()
    }
}

struct SqlxPreparedStatement {
    sql: String,
    params: Vec<SqlValue>,
    inner: Shared,
}

impl SqlxPreparedStatement {
    fn build_query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), bind_value)
    }
}

#[async_trait]
impl PreparedStatement for SqlxPreparedStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, value: SqlValue) {
        self.params.push(value);
    }

    async fn execute(&mut self) -> Result<u64, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        let result = self
            .build_query()
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to execute prepared statement", e))?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError> {
        let mut guard = self.inner.lock().await;
        let conn = open_conn(&mut guard)?;

        let rows = self
            .build_query()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("Failed to run prepared query", e))?;
        rows.iter().map(decode_row).collect()
    }
}
