// Connection Manager - single lazily-established connection with explicit transactions

use crate::application::constants::HEALTH_CHECK_TIMEOUT;
use crate::domain::{ConnectionState, Credentials, LogLevel, TransactionMode};
use crate::error::{AppError, Result};
use crate::port::{
    DatabaseConnection, DatabaseDriver, DiagnosticSink, DriverError, PreparedStatement, Statement,
};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Live connection plus the commit mode the manager put it in
struct Established {
    connection: Arc<dyn DatabaseConnection>,
    mode: TransactionMode,
}

/// Owns zero or one live database connection
///
/// Credentials are stored by [`configure`](Self::configure); the connection
/// is opened on first use and shared by every caller until
/// [`close_connection`](Self::close_connection). Establishment runs under an
/// async mutex, so concurrent first-use callers open exactly one connection.
///
/// Nested `begin_transaction` calls are not rejected: the connection simply
/// stays in manual mode and a soft warning is emitted.
pub struct ConnectionManager {
    driver: Arc<dyn DatabaseDriver>,
    diagnostics: Arc<dyn DiagnosticSink>,
    credentials: RwLock<Option<Credentials>>,
    slot: Mutex<Option<Established>>,
}

impl ConnectionManager {
    pub fn new(driver: Arc<dyn DatabaseDriver>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            driver,
            diagnostics,
            credentials: RwLock::new(None),
            slot: Mutex::new(None),
        }
    }

    /// Store credentials for later lazy connection
    ///
    /// Replaces earlier credentials; an already-open connection is untouched.
    ///
    /// # Errors
    /// - `AppError::InvalidCredentials` if `address` or `principal` is blank
    ///   or `secret` is `None` (an empty secret is accepted)
    pub fn configure(&self, address: &str, principal: &str, secret: Option<&str>) -> Result<()> {
        let credentials = Credentials::new(address, principal, secret)?;
        debug!(address = %credentials.address(), principal = %credentials.principal(), "Credentials configured");
        *self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials);
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Return the live connection, establishing it first if needed
    ///
    /// # Errors
    /// - `AppError::NotConfigured` if `configure` was never called
    /// - `AppError::ConnectionFailed` if the driver cannot connect; the
    ///   manager stays absent so a later call may retry
    pub async fn acquire_connection(&self) -> Result<Arc<dyn DatabaseConnection>> {
        let mut slot = self.slot.lock().await;
        self.acquire_locked(&mut slot).await
    }

    /// Statement for ad-hoc SQL
    pub async fn create_statement(&self) -> Result<Box<dyn Statement>> {
        let connection = self.acquire_connection().await?;
        connection
            .create_statement()
            .await
            .map_err(|e| self.statement_failed("Failed to create statement", e))
    }

    /// Prepared statement for a template with positional `?` placeholders
    ///
    /// # Errors
    /// Anything `acquire_connection` fails with, or `AppError::StatementError`
    /// if the driver rejects `sql`
    pub async fn prepare_statement(&self, sql: &str) -> Result<Box<dyn PreparedStatement>> {
        let connection = self.acquire_connection().await?;
        connection
            .prepare_statement(sql)
            .await
            .map_err(|e| self.statement_failed("Failed to prepare statement", e))
    }

    /// Bounded liveness check of the (possibly freshly opened) connection
    ///
    /// An unhealthy answer is `Ok(false)`; only a failing probe is an error.
    pub async fn is_healthy(&self) -> Result<bool> {
        let connection = self.acquire_connection().await?;
        match connection.is_valid(HEALTH_CHECK_TIMEOUT).await {
            Ok(healthy) => {
                debug!(healthy, "Health check completed");
                Ok(healthy)
            }
            Err(e) => {
                // Retryable: the next call probes again
                self.diagnostics.emit(
                    LogLevel::Warning,
                    &format!("Health check of the database connection failed: {}", e),
                );
                Err(AppError::ConnectionFailed(e))
            }
        }
    }

    /// Switch the connection into manual-commit mode
    pub async fn begin_transaction(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        let connection = self.acquire_locked(&mut slot).await?;

        if current_mode(&slot) == Some(TransactionMode::Manual) {
            self.diagnostics.emit(
                LogLevel::SoftWarning,
                "begin_transaction called while a transaction is already open; reusing it",
            );
        }

        connection
            .set_auto_commit(false)
            .await
            .map_err(|e| self.transaction_failed("Failed to begin transaction", e))?;
        set_mode(&mut slot, TransactionMode::Manual);
        debug!("Transaction started");
        Ok(())
    }

    /// Commit pending work and restore autocommit
    ///
    /// Not validated here: without an open transaction the driver decides.
    pub async fn commit_transaction(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        let connection = self.acquire_locked(&mut slot).await?;

        connection
            .commit()
            .await
            .map_err(|e| self.transaction_failed("Failed to commit transaction", e))?;
        self.restore_auto_commit(&mut slot, connection.as_ref())
            .await?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Discard pending work and restore autocommit
    pub async fn rollback_transaction(&self) -> Result<()> {
        let mut slot = self.slot.lock().await;
        let connection = self.acquire_locked(&mut slot).await?;

        connection
            .rollback()
            .await
            .map_err(|e| self.transaction_failed("Failed to roll back transaction", e))?;
        self.restore_auto_commit(&mut slot, connection.as_ref())
            .await?;
        debug!("Transaction rolled back");
        Ok(())
    }

    /// Close the connection if one exists (best effort, never fails)
    pub async fn close_connection(&self) {
        let Some(established) = self.slot.lock().await.take() else {
            return;
        };

        match established.connection.close().await {
            Ok(()) => self.diagnostics.emit(
                LogLevel::Info,
                "Connection to the database was closed successfully.",
            ),
            Err(e) => {
                warn!(error = %e, "Closing the database connection failed");
                self.diagnostics.emit(
                    LogLevel::Warning,
                    &format!("Failed to close connection to the database: {}", e),
                );
            }
        }
    }

    pub async fn state(&self) -> ConnectionState {
        if self.slot.lock().await.is_some() {
            ConnectionState::Established
        } else {
            ConnectionState::Absent
        }
    }

    /// Commit mode of the live connection, `None` when absent
    pub async fn transaction_mode(&self) -> Option<TransactionMode> {
        let slot = self.slot.lock().await;
        current_mode(&slot)
    }

    async fn acquire_locked(
        &self,
        slot: &mut Option<Established>,
    ) -> Result<Arc<dyn DatabaseConnection>> {
        let credentials = self
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AppError::NotConfigured)?;

        if let Some(established) = slot.as_ref() {
            return Ok(established.connection.clone());
        }

        debug!(address = %credentials.address(), "Establishing database connection");
        match self.driver.connect(&credentials).await {
            Ok(connection) => {
                *slot = Some(Established {
                    connection: connection.clone(),
                    mode: TransactionMode::AutoCommit,
                });
                self.diagnostics.emit(
                    LogLevel::Info,
                    "Connection to the database was established successfully.",
                );
                Ok(connection)
            }
            Err(e) => {
                self.diagnostics.emit(
                    LogLevel::Error,
                    &format!("Connection to the database failed: {}", e),
                );
                Err(AppError::ConnectionFailed(e))
            }
        }
    }

    async fn restore_auto_commit(
        &self,
        slot: &mut Option<Established>,
        connection: &dyn DatabaseConnection,
    ) -> Result<()> {
        connection
            .set_auto_commit(true)
            .await
            .map_err(|e| self.transaction_failed("Failed to restore autocommit", e))?;
        set_mode(slot, TransactionMode::AutoCommit);
        Ok(())
    }

    fn statement_failed(&self, context: &str, err: DriverError) -> AppError {
        self.diagnostics
            .emit(LogLevel::Error, &format!("{}: {}", context, err));
        AppError::StatementError(err)
    }

    fn transaction_failed(&self, context: &str, err: DriverError) -> AppError {
        self.diagnostics
            .emit(LogLevel::Error, &format!("{}: {}", context, err));
        AppError::TransactionError(err)
    }
}

fn current_mode(slot: &Option<Established>) -> Option<TransactionMode> {
    slot.as_ref().map(|e| e.mode)
}

fn set_mode(slot: &mut Option<Established>, mode: TransactionMode) {
    if let Some(established) = slot.as_mut() {
        established.mode = mode;
    }
}
