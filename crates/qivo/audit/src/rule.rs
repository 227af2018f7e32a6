//! Audit rule trait
//!
//! Rules are pure: `evaluate` reads the report and never mutates it. A rule that cannot
//! reach a verdict reports a failed outcome with an explanatory message; returning a
//! [`RuleError`] or panicking is a defect the engine contains.

use crate::error::RuleError;
use crate::scan::ScanMode;
use qivo_types::{CanonicalReport, RuleCategory, Severity};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Verdict of a single rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RuleOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// A weighted compliance rule
pub trait AuditRule: Send + Sync + Debug {
    /// Stable rule code; the identity used when diffing audits
    fn code(&self) -> &str;

    fn category(&self) -> RuleCategory;

    fn severity(&self) -> Severity;

    /// Contribution to the score denominator
    fn weight(&self) -> u32;

    /// Report section the rule inspects
    fn section(&self) -> &str;

    /// Least thorough scan mode that runs this rule
    fn mode(&self) -> ScanMode {
        ScanMode::Light
    }

    /// Suggested remediation when the rule fails
    fn recommendation(&self) -> Option<&str> {
        None
    }

    /// Evaluate the rule against a report
    fn evaluate(&self, report: &CanonicalReport) -> Result<RuleOutcome, RuleError>;
}

/// Ordered rule set; order is the registration order reflected in audit output
pub type RuleSet = Vec<Arc<dyn AuditRule>>;
