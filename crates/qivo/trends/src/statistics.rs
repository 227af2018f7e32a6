//! Dashboard statistics over a set of audits

use qivo_types::AuditResult;
use serde::{Deserialize, Serialize};

/// Placeholder for a mode over no issues
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStatistics {
    pub total_audits: usize,
    /// Rounded to one decimal
    pub average_score: f64,
    /// Rounded to one decimal
    pub average_issues: f64,
    pub most_common_category: String,
    pub most_common_severity: String,
}

/// Aggregate statistics; ties for most common go to the value seen first
pub fn audit_statistics(audits: &[AuditResult]) -> AuditStatistics {
    if audits.is_empty() {
        return AuditStatistics {
            total_audits: 0,
            average_score: 0.0,
            average_issues: 0.0,
            most_common_category: NOT_AVAILABLE.to_string(),
            most_common_severity: NOT_AVAILABLE.to_string(),
        };
    }

    let count = audits.len() as f64;
    let issues = || audits.iter().flat_map(|audit| audit.issues.iter());

    AuditStatistics {
        total_audits: audits.len(),
        average_score: round1(audits.iter().map(|a| a.score).sum::<f64>() / count),
        average_issues: round1(
            audits.iter().map(|a| a.issues.len()).sum::<usize>() as f64 / count,
        ),
        most_common_category: most_common(issues().map(|i| i.category.as_str())),
        most_common_severity: most_common(issues().map(|i| i.severity.as_str())),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let counts = values.fold(Vec::<(&str, usize)>::new(), |mut counts, value| {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
        counts
    });

    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (value, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((value, n)),
        })
        .map_or_else(|| NOT_AVAILABLE.to_string(), |(value, _)| value.to_string())
}
