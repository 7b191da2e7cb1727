// Log Domain Model

use chrono::{DateTime, Local};
use serde::Serialize;

/// Log level, ordered by severity
///
/// Severity is informational only: the sink never filters by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Debug,
    SoftWarning,
    Warning,
    Error,
}

impl LogLevel {
    /// All levels, lowest severity first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::SoftWarning,
        LogLevel::Warning,
        LogLevel::Error,
    ];

    /// Severity rank (higher = more severe)
    pub fn severity(self) -> u8 {
        match self {
            LogLevel::Info => 0,
            LogLevel::Debug => 1,
            LogLevel::SoftWarning => 2,
            LogLevel::Warning => 3,
            LogLevel::Error => 4,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::SoftWarning => write!(f, "SOFT_WARNING"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A single emitted message, kept in the sink's in-process history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    text: String,
    timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(level: LogLevel, text: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            level,
            text: text.into(),
            timestamp,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Raw message text (no prefix, no colour markers)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        let ranks: Vec<u8> = LogLevel::ALL.iter().map(|l| l.severity()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::SoftWarning < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_display() {
        assert_eq!(LogLevel::SoftWarning.to_string(), "SOFT_WARNING");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }
}
