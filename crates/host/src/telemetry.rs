//! Tracing setup for the host process
//!
//! The log sink is the operator-facing log; tracing carries the internal
//! diagnostics of the toolkit crates (connection lifecycle, driver errors).

use crate::settings::{Settings, TraceFormat};
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File receiving tracing output when `trace_file` is enabled
pub const TRACE_FILE_NAME: &str = "suno.trace.log";

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "suno=info";

/// Install the global tracing subscriber
///
/// Keep the returned guard alive for as long as the file writer should flush.
///
/// # Example
///
/// ```text
/// RUST_LOG=suno_core=debug SUNO_LOG_FORMAT=json ./host
/// ```
pub fn init_tracing(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let console_layer = match settings.trace_format {
        // Production: JSON structured logging
        TraceFormat::Json => fmt::layer().json().boxed(),
        // Development: Pretty formatting with colors
        TraceFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let (file_layer, guard) = if settings.trace_file {
        std::fs::create_dir_all(&settings.log_dir)?;
        let appender = tracing_appender::rolling::never(&settings.log_dir, TRACE_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(format = ?settings.trace_format, trace_file = settings.trace_file, "Tracing initialized");
    Ok(guard)
}
