// Application Layer - Log sink and connection lifecycle

pub mod connection_manager;
pub mod constants;
pub mod log_sink;

// Re-exports
pub use connection_manager::ConnectionManager;
pub use log_sink::{AnsiFormatter, LineFormatter, LogSink, LogSinkConfig};
