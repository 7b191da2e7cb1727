//! Suno Host - Composition Root
//!
//! Builds the log sink and connection manager a host process owns and
//! passes to its collaborators. Nothing here is global: dropping the
//! [`Host`] drops both.

pub mod settings;
pub mod telemetry;

pub use settings::{DatabaseSettings, Settings, TraceFormat};
pub use telemetry::init_tracing;

use anyhow::{Context, Result};
use std::sync::Arc;
use suno_core::port::time_provider::SystemTimeProvider;
use suno_core::port::{ConsoleChannel, DatabaseDriver, FileWriteMode, LogFileStore};
use suno_core::{ConnectionManager, LogSink, LogSinkConfig};
use suno_infra_sqlx::SqlxDriver;
use suno_infra_system::{FsLogFileStore, StdoutConsole};
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-owned context: one log sink, one connection manager
pub struct Host {
    pub log: Arc<LogSink>,
    pub db: Arc<ConnectionManager>,
}

impl Host {
    /// Wire production adapters (stdout, log directory, sqlx)
    pub fn bootstrap(settings: &Settings) -> Result<Self> {
        Self::bootstrap_with(
            settings,
            Arc::new(StdoutConsole::new()),
            Arc::new(FsLogFileStore::new(&settings.log_dir)),
            Arc::new(SqlxDriver::new()),
        )
    }

    /// Wire with caller-supplied adapters
    pub fn bootstrap_with(
        settings: &Settings,
        console: Arc<dyn ConsoleChannel>,
        store: Arc<dyn LogFileStore>,
        driver: Arc<dyn DatabaseDriver>,
    ) -> Result<Self> {
        let log = Arc::new(LogSink::new(
            console,
            store,
            Arc::new(SystemTimeProvider),
            LogSinkConfig {
                write_mode: settings.log_mode,
                info_tag: settings.log_tag.clone(),
            },
        ));

        // Append mode must not continue a stale file from an earlier run
        if settings.log_mode == FileWriteMode::Append {
            log.delete_log_files();
        }

        let db = Arc::new(ConnectionManager::new(driver, log.clone()));
        if let Some(database) = &settings.database {
            db.configure(&database.url, &database.user, database.password.as_deref())
                .context("Invalid database settings")?;
        }

        info!(
            version = VERSION,
            log_dir = %settings.log_dir.display(),
            log_mode = ?settings.log_mode,
            database_configured = db.is_configured(),
            "Suno host initialized"
        );

        Ok(Self { log, db })
    }

    /// Close the database connection (best effort)
    pub async fn shutdown(&self) {
        self.db.close_connection().await;
        info!("Suno host shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suno_core::port::console::mocks::MemoryConsole;
    use suno_core::port::database::mocks::MockDatabaseDriver;
    use suno_core::port::log_store::mocks::MemoryLogFileStore;
    use suno_core::AppError;

    fn settings_with_db(url: &str, user: &str, password: Option<&str>) -> Settings {
        Settings {
            database: Some(DatabaseSettings {
                url: url.to_string(),
                user: user.to_string(),
                password: password.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_configures_manager_lazily() {
        let driver = Arc::new(MockDatabaseDriver::new());
        let console = MemoryConsole::new();
        let host = Host::bootstrap_with(
            &settings_with_db("db://host/x", "u", Some("p")),
            Arc::new(console.clone()),
            Arc::new(MemoryLogFileStore::new()),
            driver.clone(),
        )
        .unwrap();

        assert!(host.db.is_configured());
        assert_eq!(driver.connect_attempts(), 0);

        host.db.acquire_connection().await.unwrap();
        assert!(console
            .last()
            .unwrap()
            .contains("Connection to the database was established successfully."));

        host.shutdown().await;
        assert!(driver.last_connection().unwrap().snapshot().closed);
    }

    #[test]
    fn test_bootstrap_rejects_invalid_credentials() {
        let err = Host::bootstrap_with(
            &settings_with_db("", "u", Some("p")),
            Arc::new(MemoryConsole::new()),
            Arc::new(MemoryLogFileStore::new()),
            Arc::new(MockDatabaseDriver::new()),
        )
        .err()
        .unwrap();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_bootstrap_writes_into_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            log_dir: tmp.path().join("logs"),
            ..Default::default()
        };

        let host = Host::bootstrap(&settings).unwrap();
        assert!(!host.db.is_configured());

        host.log.info("hello");
        let latest = std::fs::read_to_string(tmp.path().join("logs").join("latest.log")).unwrap();
        assert!(latest.ends_with("[SUNO] hello\n"));
        assert!(tmp.path().join("logs").join(host.log.session_file()).exists());
    }

    #[test]
    fn test_append_mode_clears_stale_files() {
        let store = MemoryLogFileStore::new();
        store
            .write_line("latest.log", "stale", FileWriteMode::Append)
            .unwrap();

        let settings = Settings {
            log_mode: FileWriteMode::Append,
            ..Default::default()
        };
        Host::bootstrap_with(
            &settings,
            Arc::new(MemoryConsole::new()),
            Arc::new(store.clone()),
            Arc::new(MockDatabaseDriver::new()),
        )
        .unwrap();

        assert!(store.contents("latest.log").is_none());
    }
}
