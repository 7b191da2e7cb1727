// Log Sink - leveled console + file logger

pub mod format;

pub use format::{strip_markers, AnsiFormatter, LineFormatter};

use crate::application::constants::{
    DEFAULT_INFO_TAG, FILE_TIMESTAMP_FORMAT, LATEST_LOG_FILE, SESSION_FILE_FORMAT,
};
use crate::domain::{LogEntry, LogLevel};
use crate::port::{ConsoleChannel, DiagnosticSink, FileWriteMode, LogFileStore, TimeProvider};
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Log sink settings
#[derive(Debug, Clone)]
pub struct LogSinkConfig {
    /// Overwrite (one line per file) or append
    pub write_mode: FileWriteMode,
    /// Tag shown in front of informational messages
    pub info_tag: String,
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        Self {
            write_mode: FileWriteMode::default(),
            info_tag: DEFAULT_INFO_TAG.to_string(),
        }
    }
}

/// Leveled logger writing to the console, an in-process history,
/// `latest.log` and a session file named for the sink's start time.
///
/// Every level is emitted; severity is never used for filtering.
pub struct LogSink {
    console: Arc<dyn ConsoleChannel>,
    store: Arc<dyn LogFileStore>,
    time_provider: Arc<dyn TimeProvider>,
    formatter: Box<dyn LineFormatter>,
    write_mode: FileWriteMode,
    started_at: DateTime<Local>,
    session_file: String,
    history: Mutex<Vec<LogEntry>>,
    // Serializes writes so the two files never interleave lines
    file_lock: Mutex<()>,
}

impl LogSink {
    pub fn new(
        console: Arc<dyn ConsoleChannel>,
        store: Arc<dyn LogFileStore>,
        time_provider: Arc<dyn TimeProvider>,
        config: LogSinkConfig,
    ) -> Self {
        let formatter = Box::new(AnsiFormatter::new(config.info_tag));
        Self::with_formatter(console, store, time_provider, config.write_mode, formatter)
    }

    /// Build with a custom formatting strategy
    pub fn with_formatter(
        console: Arc<dyn ConsoleChannel>,
        store: Arc<dyn LogFileStore>,
        time_provider: Arc<dyn TimeProvider>,
        write_mode: FileWriteMode,
        formatter: Box<dyn LineFormatter>,
    ) -> Self {
        let started_at = time_provider.now();
        let session_file = format!("{}.log", started_at.format(SESSION_FILE_FORMAT));

        Self {
            console,
            store,
            time_provider,
            formatter,
            write_mode,
            started_at,
            session_file,
            history: Mutex::new(Vec::new()),
            file_lock: Mutex::new(()),
        }
    }

    /// Format, print, record and persist one message
    pub fn emit(&self, level: LogLevel, message: &str) {
        let now = self.time_provider.now();
        let line = self.formatter.format(level, message);

        self.console.send(&line);

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry::new(level, message, now));

        let file_line = format!(
            "[{}] : {}",
            now.format(FILE_TIMESTAMP_FORMAT),
            strip_markers(&line)
        );
        self.write_to_files(&file_line);
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    /// Warning that does not colour the message body
    pub fn soft_warn(&self, message: &str) {
        self.emit(LogLevel::SoftWarning, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }

    /// Raw console message: not formatted, not recorded, not persisted
    pub fn send_message(&self, message: &str) {
        self.console.send(message);
    }

    /// Best-effort removal of `latest.log` and the session file
    ///
    /// Failures are reported as warnings and never returned.
    pub fn delete_log_files(&self) {
        for file_name in [LATEST_LOG_FILE, self.session_file.as_str()] {
            let result = {
                let _guard = self.file_lock.lock().unwrap_or_else(PoisonError::into_inner);
                self.store.remove(file_name)
            };
            if let Err(e) = result {
                self.warn(&format!("Failed to delete log file {}: {}", file_name, e));
            }
        }
    }

    /// Snapshot of every entry emitted so far
    pub fn history(&self) -> Vec<LogEntry> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn session_file(&self) -> &str {
        &self.session_file
    }

    pub fn latest_file(&self) -> &str {
        LATEST_LOG_FILE
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn write_mode(&self) -> FileWriteMode {
        self.write_mode
    }

    fn write_to_files(&self, line: &str) {
        let _guard = self.file_lock.lock().unwrap_or_else(PoisonError::into_inner);

        for file_name in [LATEST_LOG_FILE, self.session_file.as_str()] {
            if let Err(e) = self.store.write_line(file_name, line, self.write_mode) {
                debug!(file = %file_name, error = %e, "Log file write failed");
                // Console only: going through emit() again would recurse
                self.console
                    .send(&format!("Failed to write log file {}: {}", file_name, e));
            }
        }
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&self, level: LogLevel, message: &str) {
        LogSink::emit(self, level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::console::mocks::MemoryConsole;
    use crate::port::log_store::mocks::MemoryLogFileStore;
    use crate::port::time_provider::mocks::FixedTimeProvider;

    fn sink_with(
        mode: FileWriteMode,
        store: MemoryLogFileStore,
    ) -> (LogSink, MemoryConsole, MemoryLogFileStore) {
        let console = MemoryConsole::new();
        let sink = LogSink::new(
            Arc::new(console.clone()),
            Arc::new(store.clone()),
            Arc::new(FixedTimeProvider::at(2025, 3, 14, 9, 26, 53)),
            LogSinkConfig {
                write_mode: mode,
                ..Default::default()
            },
        );
        (sink, console, store)
    }

    #[test]
    fn test_session_file_named_for_start_time() {
        let (sink, _, _) = sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::new());
        assert_eq!(sink.session_file(), "2025-03-14_09-26-53.log");
        assert_eq!(sink.latest_file(), "latest.log");
    }

    #[test]
    fn test_emit_every_level_console_has_markers_file_does_not() {
        for level in LogLevel::ALL {
            let (sink, console, store) =
                sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::new());
            sink.emit(level, "disk almost full");

            let console_line = console.last().unwrap();
            assert!(console_line.contains("disk almost full"));
            assert!(console_line.contains('\x1b'), "{level}: console keeps markers");

            let file_text = store.contents("latest.log").unwrap();
            assert!(file_text.contains("disk almost full"));
            assert!(!file_text.contains('\x1b'), "{level}: file is marker-free");
            assert!(file_text.starts_with("[2025-03-14 09:26:53] : ["));
        }
    }

    #[test]
    fn test_overwrite_mode_keeps_only_last_line() {
        let (sink, _, store) = sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::new());
        sink.info("first");
        sink.warn("second");

        for name in ["latest.log", "2025-03-14_09-26-53.log"] {
            let text = store.contents(name).unwrap();
            assert_eq!(text, "[2025-03-14 09:26:53] : [WARNING] second\n");
        }
        assert_eq!(sink.history().len(), 2);
    }

    #[test]
    fn test_append_mode_keeps_all_lines() {
        let (sink, _, store) = sink_with(FileWriteMode::Append, MemoryLogFileStore::new());
        sink.info("first");
        sink.debug("second");

        let text = store.contents("latest.log").unwrap();
        assert_eq!(
            text,
            "[2025-03-14 09:26:53] : [SUNO] first\n[2025-03-14 09:26:53] : [DEBUG] second\n"
        );
        assert_eq!(store.contents("2025-03-14_09-26-53.log").unwrap(), text);
    }

    #[test]
    fn test_history_records_raw_text() {
        let (sink, _, _) = sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::new());
        sink.error("db down");
        sink.soft_warn("slow query");

        let history = sink.history();
        assert_eq!(history[0].level(), LogLevel::Error);
        assert_eq!(history[0].text(), "db down");
        assert_eq!(history[1].level(), LogLevel::SoftWarning);
        assert_eq!(history[1].timestamp(), sink.started_at());
    }

    #[test]
    fn test_file_failure_goes_to_console_only() {
        let (sink, console, _) = sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::failing());
        sink.info("hello");

        let lines = console.lines();
        // formatted line + one notice per file
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Failed to write log file latest.log"));
        assert!(!lines[1].contains('\x1b'));
        // notices are not recorded as log entries
        assert_eq!(sink.history().len(), 1);
    }

    #[test]
    fn test_delete_log_files_removes_both() {
        let (sink, _, store) = sink_with(FileWriteMode::Append, MemoryLogFileStore::new());
        sink.info("stale");
        assert_eq!(store.file_names().len(), 2);

        sink.delete_log_files();
        assert!(store.file_names().is_empty());
    }

    #[test]
    fn test_send_message_is_raw() {
        let (sink, console, store) = sink_with(FileWriteMode::Overwrite, MemoryLogFileStore::new());
        sink.send_message("plain");
        assert_eq!(console.lines(), vec!["plain".to_string()]);
        assert!(sink.history().is_empty());
        assert!(store.file_names().is_empty());
    }

    #[test]
    fn test_custom_formatter() {
        struct Bare;
        impl LineFormatter for Bare {
            fn format(&self, level: LogLevel, message: &str) -> String {
                format!("{}|{}", level, message)
            }
        }

        let console = MemoryConsole::new();
        let sink = LogSink::with_formatter(
            Arc::new(console.clone()),
            Arc::new(MemoryLogFileStore::new()),
            Arc::new(FixedTimeProvider::at(2025, 1, 1, 0, 0, 0)),
            FileWriteMode::Append,
            Box::new(Bare),
        );
        sink.debug("x");
        assert_eq!(console.last().unwrap(), "DEBUG|x");
    }
}
