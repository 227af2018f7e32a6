//! Error types for the shared model

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while interpreting shared model values
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypesError {
    /// The standard identifier does not name a registered standard
    #[error("Unsupported standard: {0}")]
    UnsupportedStandard(String),
}

/// Result type for shared model operations
pub type Result<T> = std::result::Result<T, TypesError>;
