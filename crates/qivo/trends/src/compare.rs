//! Audit-to-audit comparison
//!
//! Issues are matched by rule code only; messages may change between runs.

use crate::error::{Result, TrendError};
use crate::trend::sorted_by_date;
use chrono::{DateTime, Utc};
use qivo_types::{AuditIssue, AuditResult, RuleCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Issue-level delta between two audits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditComparison {
    pub score_delta: f64,
    pub issues_delta: i64,
    /// In `previous` but not `current`
    pub resolved_issues: Vec<AuditIssue>,
    /// In `current` but not `previous`
    pub new_issues: Vec<AuditIssue>,
    /// In both, as reported by `current`
    pub persistent_issues: Vec<AuditIssue>,
}

/// Timeline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPoint {
    pub audit_id: String,
    pub date: DateTime<Utc>,
    pub score: f64,
    pub total_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub report_id: String,
    pub comparison: AuditComparison,
    pub insights: Vec<String>,
    /// Full history, oldest first
    pub audits: Vec<AuditPoint>,
}

/// Compare two audits of the same report
pub fn compare_audits(
    previous: &AuditResult,
    current: &AuditResult,
    history: &[AuditResult],
) -> ComparisonResult {
    let previous_codes = previous.issue_codes();
    let current_codes = current.issue_codes();

    let comparison = AuditComparison {
        score_delta: current.score - previous.score,
        issues_delta: current.issues.len() as i64 - previous.issues.len() as i64,
        resolved_issues: issues_outside(&previous.issues, &current_codes),
        new_issues: issues_outside(&current.issues, &previous_codes),
        persistent_issues: current
            .issues
            .iter()
            .filter(|issue| previous_codes.contains(issue.code.as_str()))
            .cloned()
            .collect(),
    };

    ComparisonResult {
        report_id: current.report_id.clone(),
        insights: insights(previous, current, &comparison),
        comparison,
        audits: timeline(history),
    }
}

/// Compare the two most recent audits in `history`
pub fn compare_latest(history: &[AuditResult]) -> Result<ComparisonResult> {
    let audits = sorted_by_date(history);
    match audits.as_slice() {
        [.., previous, current] => Ok(compare_audits(previous, current, history)),
        _ => Err(TrendError::InsufficientHistory {
            required: 2,
            found: audits.len(),
        }),
    }
}

/// Compare two audits picked from `history` by id
pub fn compare_by_id(
    history: &[AuditResult],
    previous_id: &str,
    current_id: &str,
) -> Result<ComparisonResult> {
    let find = |id: &str| {
        history
            .iter()
            .find(|audit| audit.audit_id == id)
            .ok_or_else(|| TrendError::AuditNotFound(id.to_string()))
    };
    Ok(compare_audits(find(previous_id)?, find(current_id)?, history))
}

/// The history as timeline points, oldest first
pub fn timeline(history: &[AuditResult]) -> Vec<AuditPoint> {
    sorted_by_date(history)
        .into_iter()
        .map(|audit| AuditPoint {
            audit_id: audit.audit_id.clone(),
            date: audit.created_at,
            score: audit.score,
            total_issues: audit.issues.len(),
        })
        .collect()
}

fn issues_outside(issues: &[AuditIssue], codes: &BTreeSet<&str>) -> Vec<AuditIssue> {
    issues
        .iter()
        .filter(|issue| !codes.contains(issue.code.as_str()))
        .cloned()
        .collect()
}

fn insights(
    previous: &AuditResult,
    current: &AuditResult,
    comparison: &AuditComparison,
) -> Vec<String> {
    let delta = comparison.score_delta;
    let mut out = vec![if delta > 0.0 {
        format!(
            "Score improved {delta:.1} points ({:.1}% → {:.1}%)",
            previous.score, current.score
        )
    } else if delta < 0.0 {
        format!(
            "Score dropped {:.1} points ({:.1}% → {:.1}%)",
            delta.abs(),
            previous.score,
            current.score
        )
    } else {
        format!("Score held steady at {:.1}%", current.score)
    }];

    if !comparison.resolved_issues.is_empty() {
        out.push(format!("{} issue(s) resolved", comparison.resolved_issues.len()));
    }
    if !comparison.new_issues.is_empty() {
        out.push(format!("{} new issue(s) found", comparison.new_issues.len()));
    }
    if !comparison.persistent_issues.is_empty() {
        out.push(format!(
            "{} issue(s) still unresolved",
            comparison.persistent_issues.len()
        ));
    }

    for category in RuleCategory::ALL {
        let before = previous.issues_in(category);
        let after = current.issues_in(category);
        if before > after {
            out.push(format!("Improvement in {category}: {before} → {after} issues"));
        } else if after > before {
            out.push(format!("Regression in {category}: {before} → {after} issues"));
        }
    }

    out
}
