//! Error types for the compliance service

use qivo_audit::AuditError;
use qivo_mappers::MapperError;
use qivo_trends::TrendError;
use thiserror::Error;

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Report or audit missing from the repository
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Mapping error
    #[error(transparent)]
    Mapper(#[from] MapperError),

    /// Audit error
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// Trend error
    #[error(transparent)]
    Trend(#[from] TrendError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Repository errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Write would overwrite an existing record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend unavailable or failing
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Result type for repository operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;
