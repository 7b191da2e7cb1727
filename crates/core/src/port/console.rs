// Console Channel Port
// Host-provided operator console; assumed always available

/// Sink for formatted console lines
pub trait ConsoleChannel: Send + Sync {
    /// Deliver one line synchronously (no buffering)
    fn send(&self, line: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Console that records every line in memory
    #[derive(Default, Clone)]
    pub struct MemoryConsole {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryConsole {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }

        pub fn last(&self) -> Option<String> {
            self.lines.lock().unwrap().last().cloned()
        }
    }

    impl ConsoleChannel for MemoryConsole {
        fn send(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }
}
