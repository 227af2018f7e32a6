//! CLI error types

use qivo_audit::AuditError;
use qivo_mappers::MapperError;
use qivo_service::ServiceError;
use qivo_trends::TrendError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Input or output file could not be read or written
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON for the expected shape
    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output serialization failed
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Arguments are well-formed but unusable together
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Trend(#[from] TrendError),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
