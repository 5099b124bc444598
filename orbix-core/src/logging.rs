//! Structured logging setup.
//!
//! Thin wrapper over `tracing-subscriber` with environment-variable
//! filtering and a choice of human-readable or JSON output.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Most detailed debugging information.
    Trace,
    /// Detailed debugging information.
    Debug,
    /// Important business events.
    Info,
    /// Potential issues.
    Warn,
    /// Errors.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Single-line compact output.
    Compact,
    /// JSON output for production environments.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level emitted when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Whether to include the target module path.
    pub show_target: bool,
    /// Whether to emit span enter/close events.
    pub show_span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_target: true,
            show_span_events: false,
        }
    }
}

impl LogConfig {
    /// Configuration for development environments.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            show_target: true,
            show_span_events: true,
        }
    }

    /// Configuration for production environments.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            show_target: true,
            show_span_events: false,
        }
    }

    /// Quiet configuration for test environments.
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            show_target: false,
            show_span_events: false,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "orbix_core={},orbix_client={}",
                self.level, self.level
            ))
        })
    }

    fn span_events(&self) -> FmtSpan {
        if self.show_span_events {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

macro_rules! build_layer {
    ($config:expr, $layer:expr) => {
        $layer
            .with_target($config.show_target)
            .with_span_events($config.span_events())
            .with_filter($config.env_filter())
    };
}

/// Initializes the global logging subscriber.
///
/// Panics if a subscriber is already installed; use [`try_init_logging`] in
/// tests.
pub fn init_logging(config: &LogConfig) {
    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().pretty()))
            .init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().compact()))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().json()))
            .init(),
    }
}

/// Initializes the global logging subscriber, ignoring duplicate installs.
pub fn try_init_logging(config: &LogConfig) {
    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().pretty()))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().compact()))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_layer!(config, fmt::layer().json()))
            .try_init(),
    };
    let _ = result;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }

    #[test]
    fn test_presets() {
        assert_eq!(LogConfig::development().level, LogLevel::Debug);
        assert_eq!(LogConfig::production().format, LogFormat::Json);
        assert_eq!(LogConfig::test().level, LogLevel::Warn);
    }

    #[test]
    fn test_try_init_twice_does_not_panic() {
        try_init_logging(&LogConfig::test());
        try_init_logging(&LogConfig::test());
    }
}
