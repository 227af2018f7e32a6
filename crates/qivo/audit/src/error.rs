//! Error types for the audit engine

use qivo_types::TypesError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Audit errors
///
/// Nothing raised while evaluating a rule surfaces here; rule faults become failed
/// rules in the [`AuditResult`](qivo_types::AuditResult).
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditError {
    /// No rule set registered for the requested standard id
    #[error("Unsupported standard: {0}")]
    UnsupportedStandard(String),

    /// Unknown scan mode name
    #[error("Invalid scan mode: {0} (expected light, full or deep)")]
    InvalidScanMode(String),
}

impl From<TypesError> for AuditError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::UnsupportedStandard(id) => Self::UnsupportedStandard(id),
        }
    }
}

/// Failure reported by a rule that could not run at all
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Rule {code} failed to evaluate: {reason}")]
pub struct RuleError {
    pub code: String,
    pub reason: String,
}

impl RuleError {
    pub fn new(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
