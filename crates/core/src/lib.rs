// Suno Core - Domain Logic & Ports
// NO infrastructure dependencies: drivers, consoles and files sit behind ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{ConnectionManager, LogSink, LogSinkConfig};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
