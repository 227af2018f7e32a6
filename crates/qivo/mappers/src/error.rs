//! Error types for standard mapping

use qivo_types::TypesError;
use thiserror::Error;

/// Mapper errors
#[derive(Debug, Error)]
pub enum MapperError {
    /// No mapper registered for the requested standard id
    #[error("Unsupported standard: {0}")]
    UnsupportedStandard(String),

    /// A standard document could not be decoded
    #[error("Malformed standard document: {0}")]
    MalformedDocument(String),
}

impl From<TypesError> for MapperError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::UnsupportedStandard(id) => Self::UnsupportedStandard(id),
        }
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

/// Result type for mapper operations
pub type Result<T> = std::result::Result<T, MapperError>;
