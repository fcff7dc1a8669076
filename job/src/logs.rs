//! Logging configuration

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::errors::JobError;

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Environment variable selecting the log format
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Logging options
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log level, overridden by `RUST_LOG` when set
    pub level: LevelFilter,

    pub format: LogFormat,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Text,
        }
    }
}

impl LogOptions {
    /// Build options from `LOG_LEVEL` and `LOG_FORMAT`.
    ///
    /// Unknown values keep the defaults and are returned as warnings, to be
    /// logged once the subscriber is installed.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        let mut warnings = Vec::new();

        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|v| !v.is_empty()) {
            match level.parse::<LevelFilter>() {
                Ok(level) => options.level = level,
                Err(_) => warnings.push(format!("Invalid log level: {}", level)),
            }
        }

        if let Some(format) = lookup(LOG_FORMAT_VAR).filter(|v| !v.is_empty()) {
            match format.parse() {
                Ok(format) => options.format = format,
                Err(e) => warnings.push(e),
            }
        }

        (options, warnings)
    }
}

/// Initialize logging
pub fn init_logging(options: LogOptions) -> Result<(), JobError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match options.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    };

    installed.map_err(|e| JobError::Config(format!("Failed to install logger: {}", e)))
}
