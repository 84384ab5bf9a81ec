//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; applications that want to see
//! them can install a subscriber here or bring their own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rohde_portal::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use crate::error::PortalError;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// Single-line JSON
    JsonCompact,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, PortalError> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            other => Err(PortalError::ConfigurationError(format!(
                "Invalid log format: {other}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for [`init_subscriber`]
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// When set, logs go to this file instead of stdout
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Build from `ROHDE_LOG_LEVEL`, `ROHDE_LOG_FORMAT` and `ROHDE_LOG_FILE`.
    pub fn from_env() -> Result<Self, PortalError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PortalError> {
        let mut builder = Self::builder();
        if let Some(level) = lookup("ROHDE_LOG_LEVEL") {
            builder = builder.log_level_str(&level)?;
        }
        if let Some(format) = lookup("ROHDE_LOG_FORMAT") {
            builder = builder.output_format(OutputFormat::parse(&format)?);
        }
        if let Some(path) = lookup("ROHDE_LOG_FILE").filter(|p| !p.trim().is_empty()) {
            builder = builder.log_file(PathBuf::from(path));
        }
        Ok(builder.build())
    }

    /// Filter directive limited to this crate's targets.
    pub fn filter_directive(&self) -> String {
        format!(
            "rohde_portal={}",
            self.log_level.as_str().to_ascii_lowercase()
        )
    }
}

#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the level from `trace`, `debug`, `info`, `warn` or `error`.
    pub fn log_level_str(mut self, level: &str) -> Result<Self, PortalError> {
        let level = match level.trim().to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            other => {
                return Err(PortalError::ConfigurationError(format!(
                    "Invalid log level: {other}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            log_file: self.log_file,
        }
    }
}

/// Install a global `tracing` subscriber.
///
/// Output goes through a non-blocking writer; keep the returned guard alive
/// for as long as logs should be flushed. An already installed global subscriber is
/// left in place and `Ok(None)` is returned.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, PortalError> {
    let filter = config.filter_directive();

    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path.file_name().ok_or_else(|| {
                PortalError::ConfigurationError(format!(
                    "Invalid log file path: {}",
                    path.display()
                ))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (writer, Some(guard))
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            (writer, Some(guard))
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer);
    let init_result = match config.output_format {
        OutputFormat::Json => builder
            .with_thread_ids(true)
            .json()
            .with_current_span(true)
            .try_init(),
        OutputFormat::JsonCompact => builder
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
        OutputFormat::Text => builder.with_ansi(config.log_file.is_none()).try_init(),
    };

    match init_result {
        Ok(()) => Ok(guard),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("global default trace dispatcher has already been set") {
                Ok(None)
            } else {
                Err(PortalError::ConfigurationError(format!(
                    "Failed to initialize tracing: {msg}"
                )))
            }
        }
    }
}

/// [`init_subscriber`] with [`SubscriberConfig::from_env`].
pub fn init_from_env() -> Result<Option<WorkerGuard>, PortalError> {
    init_subscriber(SubscriberConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_environment() {
        let config = SubscriberConfig::from_lookup(lookup(&[
            ("ROHDE_LOG_LEVEL", "Debug"),
            ("ROHDE_LOG_FORMAT", "json-compact"),
            ("ROHDE_LOG_FILE", "/tmp/rohde/portal.log"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.output_format, OutputFormat::JsonCompact);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/rohde/portal.log")));
        assert_eq!(config.filter_directive(), "rohde_portal=debug");
    }

    #[test]
    fn defaults_without_environment() {
        let config = SubscriberConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn rejects_unknown_values() {
        let err = SubscriberConfig::from_lookup(lookup(&[("ROHDE_LOG_LEVEL", "loud")])).unwrap_err();
        assert!(matches!(err, PortalError::ConfigurationError(_)));
        assert!(OutputFormat::parse("xml").is_err());
    }
}
