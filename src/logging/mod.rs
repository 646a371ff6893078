// Logging module - tracing subscriber setup
//
// Console output always; JSON lines to a rolling file when enabled.
// Precedence for the filter: RUST_LOG env var > config file > default "info"

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogRotation, LoggingConfig};

/// Filter used when RUST_LOG is not set
fn default_filter(level: &str) -> String {
    format!("ott_trendy={},tower_http=debug,axum=debug", level)
}

fn file_appender(dir: &Path, prefix: &str, rotation: &LogRotation) -> RollingFileAppender {
    match rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
        LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
        LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    // Set up file logging if enabled (non-blocking writer with rotation)
    let (file_layer, guard) = if config.file_enabled {
        match std::fs::create_dir_all(&config.file_dir) {
            Ok(()) => {
                let appender =
                    file_appender(&config.file_dir, &config.file_prefix, &config.file_rotation);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                // Fall back to console-only logging
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_uses_config_level() {
        assert_eq!(
            default_filter("debug"),
            "ott_trendy=debug,tower_http=debug,axum=debug"
        );
        assert!(default_filter("warn").parse::<EnvFilter>().is_ok());
    }
}
