// sqlx::Error -> DriverError

use suno_core::port::DriverError;

// Helper to convert sqlx::Error to DriverError with structured information
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> DriverError {
    let detail = match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            Some(code) => match code.as_ref() {
                "2067" | "1555" | "23505" => {
                    format!("Unique constraint violation: {}", db_err.message())
                }
                "787" | "3850" | "23503" => {
                    format!("Foreign key constraint violation: {}", db_err.message())
                }
                "5" => format!("Database locked (SQLITE_BUSY): {}", db_err.message()),
                "13" => format!("Database full: {}", db_err.message()),
                other => format!("Database error [{}]: {}", other, db_err.message()),
            },
            None => format!("Database error: {}", db_err.message()),
        },
        sqlx::Error::RowNotFound => "Row not found".to_string(),
        sqlx::Error::ColumnNotFound(col) => format!("Column not found: {}", col),
        sqlx::Error::PoolTimedOut => "Timed out waiting for the database".to_string(),
        // Connection, protocol, TLS and IO errors
        other => other.to_string(),
    };

    DriverError::with_source(format!("{}: {}", context, detail), err)
}
