// Database Driver Port
// Generic connection-oriented client shape; any driver implementing it is acceptable

use crate::domain::{Credentials, SqlValue};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error reported by a database driver
///
/// Wraps the transport/driver failure so the manager can classify it as a
/// connection, statement or transaction error.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it reachable through `source()`
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Opens connections from credentials
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Establish a new connection
    ///
    /// # Errors
    /// Any transport or authentication failure
    async fn connect(
        &self,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DatabaseConnection>, DriverError>;
}

/// A live connection
///
/// Methods take `&self`: the handle is shared by every caller of the manager.
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// Statement for ad-hoc SQL
    async fn create_statement(&self) -> Result<Box<dyn Statement>, DriverError>;

    /// Statement for a query template with positional `?` placeholders
    ///
    /// # Errors
    /// The driver rejects the statement text
    async fn prepare_statement(&self, sql: &str) -> Result<Box<dyn PreparedStatement>, DriverError>;

    /// Liveness check bounded by `timeout`
    ///
    /// `Ok(false)` means the connection answered unhealthy (or not in time);
    /// `Err` means the probe itself could not run.
    async fn is_valid(&self, timeout: Duration) -> Result<bool, DriverError>;

    /// `false` opens a manual transaction, `true` returns to autocommit
    async fn set_auto_commit(&self, auto_commit: bool) -> Result<(), DriverError>;

    async fn commit(&self) -> Result<(), DriverError>;

    async fn rollback(&self) -> Result<(), DriverError>;

    async fn close(&self) -> Result<(), DriverError>;
}

/// One result row, columns in select order
pub type Row = Vec<SqlValue>;

/// Ad-hoc statement
#[async_trait]
pub trait Statement: Send {
    /// Execute SQL and return the number of affected rows
    async fn execute(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Run a query and collect every row
    async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Row>, DriverError>;
}

/// Prepared statement; parameter binding is the caller's job
#[async_trait]
pub trait PreparedStatement: Send {
    /// Query template this statement was prepared from
    fn sql(&self) -> &str;

    /// Bind the next positional parameter
    fn bind(&mut self, value: SqlValue);

    /// Execute with the bound parameters and return the number of affected rows
    async fn execute(&mut self) -> Result<u64, DriverError>;

    /// Run the query with the bound parameters and collect every row
    async fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock connection behavior
    #[derive(Debug, Clone, Default)]
    pub struct MockBehavior {
        /// connect() fails with this message
        pub fail_connect: Option<String>,
        /// prepare_statement() rejects SQL containing this fragment
        pub reject_sql_containing: Option<String>,
        /// set_auto_commit(false) fails with this message
        pub fail_begin: Option<String>,
        /// close() fails with this message
        pub fail_close: Option<String>,
        /// is_valid() errors with this message
        pub fail_probe: Option<String>,
        /// is_valid() answers false
        pub unhealthy: bool,
    }

    /// Mock driver that hands out [`MockConnection`]s and counts connects
    #[derive(Default)]
    pub struct MockDatabaseDriver {
        behavior: Mutex<MockBehavior>,
        connections: Mutex<Vec<Arc<MockConnection>>>,
        connect_attempts: Mutex<usize>,
    }

    impl MockDatabaseDriver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_behavior(behavior: MockBehavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                ..Default::default()
            }
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn connect_attempts(&self) -> usize {
            *self.connect_attempts.lock().unwrap()
        }

        /// Every connection successfully opened so far
        pub fn connections(&self) -> Vec<Arc<MockConnection>> {
            self.connections.lock().unwrap().clone()
        }

        pub fn last_connection(&self) -> Option<Arc<MockConnection>> {
            self.connections.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl DatabaseDriver for MockDatabaseDriver {
        async fn connect(
            &self,
            _credentials: &Credentials,
        ) -> Result<Arc<dyn DatabaseConnection>, DriverError> {
            *self.connect_attempts.lock().unwrap() += 1;
            // Yield so concurrent callers can interleave
            tokio::task::yield_now().await;

            let behavior = self.behavior.lock().unwrap().clone();
            if let Some(msg) = behavior.fail_connect {
                return Err(DriverError::new(msg));
            }

            let conn = Arc::new(MockConnection::new(behavior));
            self.connections.lock().unwrap().push(conn.clone());
            Ok(conn)
        }
    }

    /// Observable state of a [`MockConnection`]
    #[derive(Debug, Clone)]
    pub struct MockConnectionState {
        pub auto_commit: bool,
        pub commits: usize,
        pub rollbacks: usize,
        pub closed: bool,
        pub executed: Vec<String>,
    }

    /// Mock connection: commit and rollback require manual mode
    pub struct MockConnection {
        behavior: MockBehavior,
        state: Arc<Mutex<MockConnectionState>>,
    }

    impl MockConnection {
        fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                state: Arc::new(Mutex::new(MockConnectionState {
                    auto_commit: true,
                    commits: 0,
                    rollbacks: 0,
                    closed: false,
                    executed: Vec::new(),
                })),
            }
        }

        pub fn snapshot(&self) -> MockConnectionState {
            self.state.lock().unwrap().clone()
        }

        fn ensure_open(&self) -> Result<(), DriverError> {
            if self.state.lock().unwrap().closed {
                return Err(DriverError::new("connection is closed"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DatabaseConnection for MockConnection {
        async fn create_statement(&self) -> Result<Box<dyn Statement>, DriverError> {
            self.ensure_open()?;
            Ok(Box::new(MockStatement {
                state: self.state.clone(),
            }))
        }

        async fn prepare_statement(
            &self,
            sql: &str,
        ) -> Result<Box<dyn PreparedStatement>, DriverError> {
            self.ensure_open()?;
            if let Some(fragment) = &self.behavior.reject_sql_containing {
                if sql.contains(fragment.as_str()) {
                    return Err(DriverError::new(format!("syntax error near {:?}", fragment)));
                }
            }
            Ok(Box::new(MockPreparedStatement {
                sql: sql.to_string(),
                params: Vec::new(),
                state: self.state.clone(),
            }))
        }

        async fn is_valid(&self, _timeout: Duration) -> Result<bool, DriverError> {
            if let Some(msg) = &self.behavior.fail_probe {
                return Err(DriverError::new(msg.clone()));
            }
            let closed = self.state.lock().unwrap().closed;
            Ok(!closed && !self.behavior.unhealthy)
        }

        async fn set_auto_commit(&self, auto_commit: bool) -> Result<(), DriverError> {
            self.ensure_open()?;
            if !auto_commit {
                if let Some(msg) = &self.behavior.fail_begin {
                    return Err(DriverError::new(msg.clone()));
                }
            }
            let mut state = self.state.lock().unwrap();
            if auto_commit && !state.auto_commit {
                // Leaving manual mode commits pending work
                state.commits += 1;
            }
            state.auto_commit = auto_commit;
            Ok(())
        }

        async fn commit(&self) -> Result<(), DriverError> {
            self.ensure_open()?;
            let mut state = self.state.lock().unwrap();
            if state.auto_commit {
                return Err(DriverError::new("no active transaction"));
            }
            state.commits += 1;
            Ok(())
        }

        async fn rollback(&self) -> Result<(), DriverError> {
            self.ensure_open()?;
            let mut state = self.state.lock().unwrap();
            if state.auto_commit {
                return Err(DriverError::new("no active transaction"));
            }
            state.rollbacks += 1;
            Ok(())
        }

        async fn close(&self) -> Result<(), DriverError> {
            if let Some(msg) = &self.behavior.fail_close {
                return Err(DriverError::new(msg.clone()));
            }
            self.state.lock().unwrap().closed = true;
            Ok(())
        }
    }

    struct MockStatement {
        state: Arc<Mutex<MockConnectionState>>,
    }

    #[async_trait]
    impl Statement for MockStatement {
        async fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(DriverError::new("connection is closed"));
            }
            state.executed.push(sql.to_string());
            Ok(1)
        }

        async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
            self.execute(sql).await?;
            Ok(Vec::new())
        }
    }

    struct MockPreparedStatement {
        sql: String,
        params: Vec<SqlValue>,
        state: Arc<Mutex<MockConnectionState>>,
    }

    #[async_trait]
    impl PreparedStatement for MockPreparedStatement {
        fn sql(&self) -> &str {
            &self.sql
        }

        fn bind(&mut self, value: SqlValue) {
            self.params.push(value);
        }

        async fn execute(&mut self) -> Result<u64, DriverError> {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(DriverError::new("connection is closed"));
            }
            state
                .executed
                .push(format!("{} -- {} param(s)", self.sql, self.params.len()));
            Ok(1)
        }

        async fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError> {
            self.execute().await?;
            // Echo the bound parameters back as a single row
            Ok(vec![self.params.clone()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_driver_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DriverError::with_source("connect failed", io);
        assert_eq!(err.to_string(), "connect failed");
        assert_eq!(err.source().unwrap().to_string(), "refused");
        assert!(DriverError::new("plain").source().is_none());
    }
}
