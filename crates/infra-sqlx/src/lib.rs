// Suno Infrastructure - sqlx Adapter
// Implements: DatabaseDriver, DatabaseConnection (sqlite, postgres via sqlx::Any)

mod connection;
mod connection_url;
mod driver;
mod error;

pub use connection::SqlxConnection;
pub use connection_url::connection_url;
pub use driver::SqlxDriver;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for DriverError here)
