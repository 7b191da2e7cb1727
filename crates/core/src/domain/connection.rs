// Connection Lifecycle Types

use serde::Serialize;

/// Lifecycle state of the managed connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No live connection (never opened, failed, or closed)
    Absent,
    /// A live connection is cached and shared by every caller
    Established,
}

/// Commit mode carried by an established connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    /// Every statement commits immediately
    #[default]
    AutoCommit,
    /// Between begin and commit/rollback
    Manual,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Absent => write!(f, "absent"),
            ConnectionState::Established => write!(f, "established"),
        }
    }
}

impl std::fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionMode::AutoCommit => write!(f, "autocommit"),
            TransactionMode::Manual => write!(f, "manual"),
        }
    }
}
