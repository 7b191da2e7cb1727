// Domain Layer - Pure types shared by the log sink and the connection manager

pub mod connection;
pub mod credentials;
pub mod log;
pub mod value;

// Re-exports
pub use connection::{ConnectionState, TransactionMode};
pub use credentials::Credentials;
pub use log::{LogEntry, LogLevel};
pub use value::SqlValue;
