//! Scan modes and scan reports
//!
//! A scan runs the KRCI catalog at one of three depths. Every rule declares the least
//! thorough mode that runs it, so `Light ⊂ Full ⊂ Deep`.

use crate::engine::{run_audit, run_audit_concurrent};
use crate::error::AuditError;
use crate::krci::{rule_set, CatalogContext};
use crate::rule::AuditRule;
use qivo_types::{AuditResult, CanonicalReport, RuleCategory, Severity, StandardId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Most recommendations carried by a scan report
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Scan depth
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Critical regulatory and disclosure checks only
    Light,
    #[default]
    Full,
    /// Every rule in the catalog
    Deep,
}

impl ScanMode {
    pub const ALL: [ScanMode; 3] = [ScanMode::Light, ScanMode::Full, ScanMode::Deep];

    /// Whether a scan in this mode runs a rule declaring `rule_mode`
    pub fn includes(self, rule_mode: ScanMode) -> bool {
        rule_mode <= self
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Full => "full",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "full" => Ok(Self::Full),
            "deep" => Ok(Self::Deep),
            _ => Err(AuditError::InvalidScanMode(s.to_string())),
        }
    }
}

/// Audit result enriched with per-category scores and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub mode: ScanMode,
    pub standard: StandardId,
    pub audit: AuditResult,
    /// Weighted pass rate per category; 100 for categories without rules
    pub category_scores: BTreeMap<RuleCategory, f64>,
    /// Remediation for failed critical and high rules, de-duplicated
    pub recommendations: Vec<String>,
}

impl ScanReport {
    /// Wrap an audit produced from `rules`
    pub fn from_audit(
        mode: ScanMode,
        standard: StandardId,
        audit: AuditResult,
        rules: &[Arc<dyn AuditRule>],
    ) -> Self {
        Self {
            category_scores: category_scores(&audit, rules),
            recommendations: recommendations(&audit, rules),
            mode,
            standard,
            audit,
        }
    }
}

/// Scan a report with the KRCI catalog for `standard`
pub fn run_scan(
    report_id: &str,
    report: &CanonicalReport,
    standard: StandardId,
    mode: ScanMode,
    context: &CatalogContext,
) -> ScanReport {
    let rules = rule_set(standard, mode, context);
    let audit = run_audit(report_id, report, &rules);
    ScanReport::from_audit(mode, standard, audit, &rules)
}

/// [`run_scan`] with rules evaluated concurrently
pub async fn run_scan_concurrent(
    report_id: &str,
    report: Arc<CanonicalReport>,
    standard: StandardId,
    mode: ScanMode,
    context: &CatalogContext,
) -> ScanReport {
    let rules = rule_set(standard, mode, context);
    let audit = run_audit_concurrent(report_id, report, &rules).await;
    ScanReport::from_audit(mode, standard, audit, &rules)
}

fn category_scores(
    audit: &AuditResult,
    rules: &[Arc<dyn AuditRule>],
) -> BTreeMap<RuleCategory, f64> {
    let failed_codes: HashSet<&str> = audit.issues.iter().map(|i| i.code.as_str()).collect();

    // weights come from `rules` alone; issues of rules outside the set are ignored
    RuleCategory::ALL
        .iter()
        .map(|&category| {
            let (total, failed) = rules
                .iter()
                .filter(|rule| rule.category() == category)
                .fold((0u32, 0u32), |(total, failed), rule| {
                    let lost = if failed_codes.contains(rule.code()) {
                        rule.weight()
                    } else {
                        0
                    };
                    (total + rule.weight(), failed + lost)
                });

            let score = if total == 0 {
                100.0
            } else {
                100.0 * f64::from(total.saturating_sub(failed)) / f64::from(total)
            };
            (category, score)
        })
        .collect()
}

fn recommendations(audit: &AuditResult, rules: &[Arc<dyn AuditRule>]) -> Vec<String> {
    audit
        .issues
        .iter()
        .filter(|issue| matches!(issue.severity, Severity::Critical | Severity::High))
        .map(|issue| {
            rules
                .iter()
                .find(|rule| rule.code() == issue.code)
                .and_then(|rule| rule.recommendation())
                .map(str::to_string)
                .unwrap_or_else(|| issue.message.clone())
        })
        .fold(Vec::new(), |mut unique, recommendation| {
            if unique.len() < MAX_RECOMMENDATIONS && !unique.contains(&recommendation) {
                unique.push(recommendation);
            }
            unique
        })
}
