// Central Error Type for the Application

use crate::port::DriverError;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Connection manager is not configured: call configure() first")]
    NotConfigured,

    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] DriverError),

    #[error("Statement error: {0}")]
    StatementError(#[source] DriverError),

    #[error("Transaction error: {0}")]
    TransactionError(#[source] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials(_) => "invalid_credentials",
            AppError::NotConfigured => "not_configured",
            AppError::ConnectionFailed(_) => "connection_failed",
            AppError::StatementError(_) => "statement_error",
            AppError::TransactionError(_) => "transaction_error",
            AppError::Io(_) => "io",
            AppError::Config(_) => "config",
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
