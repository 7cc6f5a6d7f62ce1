use std::{env, error::Error, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

/// Environment variable selecting the output format (`pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "MPRIS_REMOTE_LOG_FORMAT";

/// Initialize tracing for the application
///
/// Uses `RUST_LOG` if set, otherwise `level`. Output goes to stdout, pretty
/// by default or JSON when `MPRIS_REMOTE_LOG_FORMAT=json`. With a `log_dir`
/// logs are also written to a daily rotated file there; keep the returned
/// guard alive until exit so buffered lines are flushed.
///
/// # Errors
/// Returns error if file creation or tracing subscriber initialization fails
pub fn init(level: LogLevel, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    const DAYS_TO_KEEP: usize = 7;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::Builder::new()
                .rotation(tracing_appender::rolling::Rotation::DAILY)
                .max_log_files(DAYS_TO_KEEP)
                .filename_prefix("mpris-remote")
                .filename_suffix("log")
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());

    let registry = tracing_subscriber::registry().with(env_filter);

    match format.as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stdout),
                )
                .with(file_writer.map(|writer| {
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(writer)
                        .with_ansi(false)
                }))
                .try_init()?;
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(io::stdout),
                )
                .with(file_writer.map(|writer| {
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(writer)
                        .with_ansi(false)
                }))
                .try_init()?;
        }
    }

    Ok(guard)
}
