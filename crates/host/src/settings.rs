// Host settings from environment variables

use std::path::PathBuf;
use suno_core::application::constants::{DEFAULT_INFO_TAG, DEFAULT_LOG_DIR};
use suno_core::port::FileWriteMode;
use suno_core::{AppError, Result};

/// Console format of the internal tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    #[default]
    Pretty,
    Json,
}

/// Database credentials as read from the environment (not yet validated)
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub user: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything the host needs to wire the toolkit
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` when `SUNO_DB_URL` is unset: configure the manager later
    pub database: Option<DatabaseSettings>,
    pub log_dir: PathBuf,
    pub log_mode: FileWriteMode,
    pub log_tag: String,
    pub trace_format: TraceFormat,
    /// Mirror tracing output into `<log_dir>/suno.trace.log`
    pub trace_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_mode: FileWriteMode::default(),
            log_tag: DEFAULT_INFO_TAG.to_string(),
            trace_format: TraceFormat::default(),
            trace_file: false,
        }
    }
}

impl Settings {
    /// Read `SUNO_*` variables from the process environment
    ///
    /// # Environment Variables
    ///
    /// - `SUNO_DB_URL`, `SUNO_DB_USER`, `SUNO_DB_PASSWORD`: database credentials
    /// - `SUNO_LOG_DIR`: log directory (default: suno/logs)
    /// - `SUNO_LOG_MODE`: `overwrite` | `append` (default: overwrite)
    /// - `SUNO_LOG_TAG`: informational tag (default: SUNO)
    /// - `SUNO_LOG_FORMAT`: `pretty` | `json` tracing output
    /// - `SUNO_TRACE_FILE`: `true` to also write tracing output to a file
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let database = lookup("SUNO_DB_URL").map(|url| DatabaseSettings {
            url,
            user: lookup("SUNO_DB_USER").unwrap_or_default(),
            password: lookup("SUNO_DB_PASSWORD"),
        });

        let log_mode = match lookup("SUNO_LOG_MODE") {
            Some(raw) => raw.parse().map_err(AppError::Config)?,
            None => defaults.log_mode,
        };

        let trace_format = match lookup("SUNO_LOG_FORMAT").as_deref() {
            None | Some("pretty") => TraceFormat::Pretty,
            Some("json") => TraceFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "SUNO_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        };

        let trace_file = match lookup("SUNO_TRACE_FILE") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|_| {
                AppError::Config(format!("SUNO_TRACE_FILE must be true or false, got '{}'", raw))
            })?,
            None => defaults.trace_file,
        };

        Ok(Self {
            database,
            log_dir: lookup("SUNO_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_mode,
            log_tag: lookup("SUNO_LOG_TAG").unwrap_or(defaults.log_tag),
            trace_format,
            trace_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert!(settings.database.is_none());
        assert_eq!(settings.log_dir, PathBuf::from("suno/logs"));
        assert_eq!(settings.log_mode, FileWriteMode::Overwrite);
        assert_eq!(settings.log_tag, "SUNO");
        assert_eq!(settings.trace_format, TraceFormat::Pretty);
        assert!(!settings.trace_file);
    }

    #[test]
    fn test_full_environment() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("SUNO_DB_URL", "postgres://db/suno"),
            ("SUNO_DB_USER", "suno"),
            ("SUNO_DB_PASSWORD", ""),
            ("SUNO_LOG_DIR", "/var/log/suno"),
            ("SUNO_LOG_MODE", "append"),
            ("SUNO_LOG_TAG", "LOBBY"),
            ("SUNO_LOG_FORMAT", "json"),
            ("SUNO_TRACE_FILE", "true"),
        ]))
        .unwrap();

        let db = settings.database.unwrap();
        assert_eq!(db.url, "postgres://db/suno");
        assert_eq!(db.password.as_deref(), Some(""));
        assert_eq!(settings.log_mode, FileWriteMode::Append);
        assert_eq!(settings.log_tag, "LOBBY");
        assert_eq!(settings.trace_format, TraceFormat::Json);
        assert!(settings.trace_file);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pairs in [
            [("SUNO_LOG_MODE", "rotate")],
            [("SUNO_LOG_FORMAT", "xml")],
            [("SUNO_TRACE_FILE", "maybe")],
        ] {
            let err = Settings::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{:?}", pairs);
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let db = DatabaseSettings {
            url: "postgres://h/db".to_string(),
            user: "u".to_string(),
            password: Some("hunter2".to_string()),
        };
        assert!(!format!("{:?}", db).contains("hunter2"));
    }
}
