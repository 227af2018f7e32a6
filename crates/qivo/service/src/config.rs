//! Configuration for the compliance service

use qivo_audit::krci::DEFAULT_STALE_AFTER_MONTHS;
use qivo_audit::ScanMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix; nested keys use `__`, e.g. `QIVO_AUDIT__DEFAULT_MODE`
pub const ENV_PREFIX: &str = "QIVO";

/// Service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Audit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Scan mode when the caller does not pick one
    #[serde(default)]
    pub default_mode: ScanMode,

    /// Evaluate rules on the blocking pool
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Age after which a report is flagged as outdated
    #[serde(default = "default_stale_after_months")]
    pub stale_after_months: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::default(),
            parallel: true,
            stale_after_months: DEFAULT_STALE_AFTER_MONTHS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_stale_after_months() -> u32 {
    DEFAULT_STALE_AFTER_MONTHS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ServiceConfig {
    /// Load configuration: defaults, then the optional file, then `QIVO_` environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ServiceConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
