//! Audit record shapes
//!
//! [`AuditResult`] is created once per audit run and never updated afterwards. Its JSON
//! shape is consumed by external exporters and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Severity of a KRCI finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KRCI rule category; also the unit of trend tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Mining titles and regulatory registration
    Tenure,
    /// Geology, resources and reserves
    Geo,
    /// Environmental, social and governance
    Esg,
    /// Conformance to the reporting standard
    Norma,
    /// Remote sensing
    #[serde(rename = "satelite")]
    Satellite,
    /// Peer comparison
    Benchmark,
}

impl RuleCategory {
    /// Tracked categories, in reporting order
    pub const ALL: [RuleCategory; 6] = [
        RuleCategory::Tenure,
        RuleCategory::Geo,
        RuleCategory::Esg,
        RuleCategory::Norma,
        RuleCategory::Satellite,
        RuleCategory::Benchmark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenure => "tenure",
            Self::Geo => "geo",
            Self::Esg => "esg",
            Self::Norma => "norma",
            Self::Satellite => "satelite",
            Self::Benchmark => "benchmark",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding emitted by a failed rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditIssue {
    /// Rule code; the identity used when diffing audits
    pub code: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub section: String,
    pub message: String,
    pub weight: u32,
}

/// Outcome of one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub audit_id: String,
    pub report_id: String,
    /// Weighted pass rate, 0 to 100
    pub score: f64,
    pub total_rules: usize,
    pub passed_rules: usize,
    pub failed_rules: usize,
    /// Failed rules in registration order
    pub issues: Vec<AuditIssue>,
    pub created_at: DateTime<Utc>,
}

impl AuditResult {
    /// Number of issues in `category`
    pub fn issues_in(&self, category: RuleCategory) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.category == category)
            .count()
    }

    /// Issue codes as a set
    pub fn issue_codes(&self) -> BTreeSet<&str> {
        self.issues.iter().map(|issue| issue.code.as_str()).collect()
    }

    /// Issue counts per severity
    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_issues(&self.issues)
    }

    /// Whether no rule failed
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Issue counts by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    /// Count issues by severity
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a AuditIssue>) -> Self {
        issues
            .into_iter()
            .fold(Self::default(), |counts, issue| counts.incremented(issue.severity))
    }

    /// A copy with one more issue of `severity`
    pub fn incremented(self, severity: Severity) -> Self {
        match severity {
            Severity::Critical => Self {
                critical: self.critical + 1,
                ..self
            },
            Severity::High => Self {
                high: self.high + 1,
                ..self
            },
            Severity::Medium => Self {
                medium: self.medium + 1,
                ..self
            },
            Severity::Low => Self {
                low: self.low + 1,
                ..self
            },
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}
