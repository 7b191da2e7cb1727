// Log File Store Port

use serde::Serialize;
use std::io;

/// How a log line reaches its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileWriteMode {
    /// Truncate and rewrite on every line (only the last line survives)
    #[default]
    Overwrite,
    /// Append each line to the end of the file
    Append,
}

impl std::str::FromStr for FileWriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(FileWriteMode::Overwrite),
            "append" => Ok(FileWriteMode::Append),
            other => Err(format!("unknown file write mode: {}", other)),
        }
    }
}

/// Durable destination for plain-text log lines, addressed by file name
pub trait LogFileStore: Send + Sync {
    /// Write one line (newline appended by the store)
    fn write_line(&self, file_name: &str, line: &str, mode: FileWriteMode) -> io::Result<()>;

    /// Remove a file; a missing file is not an error
    fn remove(&self, file_name: &str) -> io::Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory file store
    #[derive(Default, Clone)]
    pub struct MemoryLogFileStore {
        files: Arc<Mutex<HashMap<String, String>>>,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl MemoryLogFileStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store whose writes all fail with `PermissionDenied`
        pub fn failing() -> Self {
            let store = Self::default();
            *store.fail_writes.lock().unwrap() = true;
            store
        }

        pub fn contents(&self, file_name: &str) -> Option<String> {
            self.files.lock().unwrap().get(file_name).cloned()
        }

        pub fn file_names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl LogFileStore for MemoryLogFileStore {
        fn write_line(&self, file_name: &str, line: &str, mode: FileWriteMode) -> io::Result<()> {
            if *self.fail_writes.lock().unwrap() {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("cannot write {}", file_name),
                ));
            }
            let mut files = self.files.lock().unwrap();
            let entry = files.entry(file_name.to_string()).or_default();
            if mode == FileWriteMode::Overwrite {
                entry.clear();
            }
            entry.push_str(line);
            entry.push('\n');
            Ok(())
        }

        fn remove(&self, file_name: &str) -> io::Result<()> {
            self.files.lock().unwrap().remove(file_name);
            Ok(())
        }
    }
}
