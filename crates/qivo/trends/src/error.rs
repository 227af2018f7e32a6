//! Error types for the trend engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trend and comparison errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendError {
    /// Fewer audits than the computation needs
    #[error("Insufficient audit history: need at least {required}, found {found}")]
    InsufficientHistory { required: usize, found: usize },

    /// Audit id not present in the supplied history
    #[error("Audit not found: {0}")]
    AuditNotFound(String),
}

/// Failure reported by a section rewriter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Section rewrite failed: {0}")]
pub struct RewriteError(pub String);

/// Result type for trend operations
pub type Result<T> = std::result::Result<T, TrendError>;
