// Port Layer - Interfaces for external dependencies

pub mod console;
pub mod database;
pub mod diagnostics;
pub mod log_store;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use console::ConsoleChannel;
pub use database::{
    DatabaseConnection, DatabaseDriver, DriverError, PreparedStatement, Row, Statement,
};
pub use diagnostics::DiagnosticSink;
pub use log_store::{FileWriteMode, LogFileStore};
pub use time_provider::TimeProvider;
