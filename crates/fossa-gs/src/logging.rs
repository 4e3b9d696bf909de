//! Diagnostic logging for the ground station binary.
//!
//! Reports go to stdout as JSON, so log records always go to stderr. The
//! level comes from `--log-level` when given, otherwise from `RUST_LOG`.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Shape of the log records written to stderr.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One human readable line per record.
    Text,
    /// One JSON object per record.
    Json,
}

/// Minimum level selected on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    /// Adds rejected frames and sections.
    Debug,
    /// Adds every encoded frame and each link decoding step.
    Trace,
}

impl LogLevel {
    /// Matching `tracing` level filter.
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Filter for an explicit level, or from `RUST_LOG` with `info` as fallback.
pub fn log_filter(level: Option<LogLevel>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::default().add_directive(level.as_filter().into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Install the global subscriber.
///
/// A second call keeps the first subscriber, so tests may call it freely.
pub fn init_logging(format: LogFormat, level: Option<LogLevel>) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(level))
        .with_ansi(false)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Error.as_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Warn.as_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Trace.as_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn test_init_twice() {
        init_logging(LogFormat::Json, Some(LogLevel::Error));
        init_logging(LogFormat::Text, Some(LogLevel::Trace));
    }
}
