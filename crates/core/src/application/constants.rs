// Shared constants (no magic values)
use std::time::Duration;

/// Fixed timeout for the connection health probe (5s)
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// File that always holds the most recent log output
pub const LATEST_LOG_FILE: &str = "latest.log";

/// Default log directory, relative to the host working directory
pub const DEFAULT_LOG_DIR: &str = "suno/logs";

/// Default tag printed in front of informational messages
pub const DEFAULT_INFO_TAG: &str = "SUNO";

/// Session file name pattern (process start time)
pub const SESSION_FILE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Timestamp pattern at the start of every file line
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
