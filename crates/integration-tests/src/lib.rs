//! Shared fixtures for the end-to-end tests

use chrono::{Local, TimeZone};
use std::path::Path;
use std::sync::Arc;
use suno_core::port::console::mocks::MemoryConsole;
use suno_core::port::time_provider::mocks::FixedTimeProvider;
use suno_core::port::FileWriteMode;
use suno_core::{ConnectionManager, LogSink, LogSinkConfig};
use suno_infra_sqlx::SqlxDriver;
use suno_infra_system::FsLogFileStore;

/// Log sink writing real files under `dir`, console captured in memory,
/// clock frozen at 2025-06-01 12:00:00 local time
pub fn file_sink(dir: &Path, mode: FileWriteMode) -> (Arc<LogSink>, MemoryConsole) {
    let console = MemoryConsole::new();
    let start = Local
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .earliest()
        .expect("fixed test time is valid");
    let sink = LogSink::new(
        Arc::new(console.clone()),
        Arc::new(FsLogFileStore::new(dir)),
        Arc::new(FixedTimeProvider::new(start)),
        LogSinkConfig {
            write_mode: mode,
            ..Default::default()
        },
    );
    (Arc::new(sink), console)
}

/// Connection manager backed by sqlx, diagnostics going to `sink`
pub fn sqlx_manager(sink: Arc<LogSink>) -> ConnectionManager {
    ConnectionManager::new(Arc::new(SqlxDriver::new()), sink)
}
