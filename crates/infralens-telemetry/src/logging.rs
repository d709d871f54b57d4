//! Logging configuration and subscriber installation.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable output.
    Pretty,
    /// Single-line output (default).
    #[default]
    Compact,
    /// Newline-delimited JSON for log shippers.
    Json,
    /// The default `tracing-subscriber` formatter.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::ConfigError(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// Log output target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stdout.
    Stdout,
    /// Log to stderr.
    #[default]
    Stderr,
    /// Log to daily-rotated files in the given directory.
    File(PathBuf),
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LogConfig {
    /// Log level filter (e.g. "info", "debug").
    pub level: String,
    /// Log format.
    pub format: LogFormat,
    /// Log target.
    pub target: LogTarget,
    /// File name prefix used when `target` is a directory.
    pub file_prefix: String,
    /// Whether to include timestamps.
    pub timestamps: bool,
    /// Whether to include file/line info.
    pub file_info: bool,
    /// Whether to emit span open/close events.
    pub span_events: bool,
    /// Whether to use ANSI colors.
    pub ansi: bool,
    /// Directive overrides (e.g. `infralens_registry=debug`).
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            file_prefix: "infralens".to_owned(),
            timestamps: true,
            file_info: false,
            span_events: false,
            ansi: true,
            directives: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Create a new log config with the specified level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the log format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Write logs to daily-rotated files under `directory`.
    #[must_use]
    pub fn with_file_logging(
        mut self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        self.target = LogTarget::File(directory.into());
        self.file_prefix = prefix.into();
        self.ansi = false;
        self
    }

    /// Add a directive override.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Disable timestamps.
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    /// Enable file/line info.
    #[must_use]
    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    /// Emit an event whenever a span opens or closes.
    #[must_use]
    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;

        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::ConfigError(e.to_string())
                },
            )?);
        }

        Ok(filter)
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let base = fmt::layer()
            .with_writer(writer)
            .with_ansi(self.ansi)
            .with_file(self.file_info)
            .with_line_number(self.file_info)
            .with_span_events(self.fmt_span());

        match (self.format, self.timestamps) {
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
            (LogFormat::Full, true) => base.boxed(),
            (LogFormat::Full, false) => base.without_time().boxed(),
        }
    }
}

#[cfg(feature = "config")]
impl From<&infralens_config::LoggingSection> for LogConfig {
    fn from(section: &infralens_config::LoggingSection) -> Self {
        let mut config = Self::new(section.level.clone());
        config.format = section.format.parse().unwrap_or_default();
        config.directives.clone_from(&section.directives);
        config
    }
}

/// Install a global subscriber built from `config`.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the log directory cannot be
/// created, or a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;

    let layer = match &config.target {
        LogTarget::Stdout => config.layer(std::io::stdout),
        LogTarget::Stderr => config.layer(std::io::stderr),
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, &config.file_prefix);
            config.layer(appender)
        },
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Set up default logging (info level, stderr, compact format).
///
/// # Errors
///
/// Returns an error if logging cannot be initialized.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.target, LogTarget::Stderr);
        assert!(config.timestamps);
        assert!(config.ansi);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .without_timestamps()
            .with_span_events()
            .with_file_info()
            .with_directive("infralens_registry=trace");

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.timestamps);
        assert!(config.span_events);
        assert!(config.file_info);
        assert_eq!(config.directives, vec!["infralens_registry=trace"]);
    }

    #[test]
    fn test_file_logging_disables_ansi() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::default().with_file_logging(dir.path(), "resolver");
        assert_eq!(config.target, LogTarget::File(dir.path().to_path_buf()));
        assert_eq!(config.file_prefix, "resolver");
        assert!(!config.ansi);
    }

    #[test]
    fn test_log_config_serialization() {
        let config = LogConfig::new("warn").with_format(LogFormat::Pretty);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"level\":\"warn\""));
        assert!(json.contains("\"format\":\"pretty\""));

        let parsed: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.level, "warn");
        assert_eq!(parsed.format, LogFormat::Pretty);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_build_filter() {
        let config = LogConfig::new("debug").with_directive("infralens=trace");
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn test_build_filter_invalid() {
        // EnvFilter is permissive with unknown targets, so use invalid syntax
        let config = LogConfig::new("debug").with_directive("[invalid=syntax");
        assert!(config.build_filter().is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_logging_section() {
        let section = infralens_config::LoggingSection {
            level: "debug".to_owned(),
            format: "json".to_owned(),
            directives: vec!["infralens_toolsets=trace".to_owned()],
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directives.len(), 1);
    }
}
