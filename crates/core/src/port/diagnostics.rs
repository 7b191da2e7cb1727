// Diagnostic Port
// The only contract between the connection manager and the log sink

use crate::domain::LogLevel;

/// Receiver of leveled diagnostic messages
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: LogLevel, message: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Diagnostic sink that records (level, message) pairs
    #[derive(Default, Clone)]
    pub struct RecordingDiagnostics {
        records: Arc<Mutex<Vec<(LogLevel, String)>>>,
    }

    impl RecordingDiagnostics {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn records(&self) -> Vec<(LogLevel, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn count_at(&self, level: LogLevel) -> usize {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .count()
        }
    }

    impl DiagnosticSink for RecordingDiagnostics {
        fn emit(&self, level: LogLevel, message: &str) {
            self.records
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }
}
