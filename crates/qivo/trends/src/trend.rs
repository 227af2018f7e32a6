//! Score progression and category trends over a report's audit history
//!
//! Only the first and last audits (by `createdAt`) decide the overall trend and the
//! per-category improvements and regressions. Averages and extremes cover every audit.

use crate::error::{Result, TrendError};
use chrono::{DateTime, Utc};
use qivo_types::{AuditResult, RuleCategory, SeverityCounts};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Score delta beyond which the trend is no longer stable
pub const TREND_THRESHOLD: f64 = 5.0;
/// Category change percentage beyond which it is reported
pub const CATEGORY_CHANGE_THRESHOLD: f64 = 10.0;
/// Average score under which a systematic review is recommended
pub const REVIEW_BELOW_AVERAGE: f64 = 75.0;

const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// Direction of the score over the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    /// Classify a first-to-last score delta
    pub fn from_delta(delta: f64) -> Self {
        if delta > TREND_THRESHOLD {
            Self::Improving
        } else if delta < -TREND_THRESHOLD {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit on the score timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: String,
    pub score: f64,
    pub total_issues: usize,
    pub issues_by_severity: SeverityCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub period: String,
    pub count: usize,
}

/// Issue counts of one category across the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: RuleCategory,
    pub data: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryImprovement {
    pub category: RuleCategory,
    /// Percentage drop in issue count
    pub improvement: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRegression {
    pub category: RuleCategory,
    /// Percentage rise in issue count
    pub regression: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub trend: Trend,
    /// Last score minus first score
    pub total_improvement: f64,
}

/// Trend analysis of one report's audits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsResult {
    pub report_id: String,
    pub total_audits: usize,
    pub date_range: DateRange,
    pub score_progression: Vec<TrendPoint>,
    pub category_trends: Vec<CategoryTrend>,
    pub improvements: Vec<CategoryImprovement>,
    pub regressions: Vec<CategoryRegression>,
    pub summary: TrendSummary,
    pub recommendations: Vec<String>,
}

/// Analyze a report's audit history
///
/// The history may arrive in any order. An empty history is an error; a single audit
/// yields a stable trend with zero improvement.
pub fn compute_trends(history: &[AuditResult]) -> Result<TrendsResult> {
    let audits = sorted_by_date(history);
    let (Some(first), Some(last)) = (audits.first(), audits.last()) else {
        return Err(TrendError::InsufficientHistory {
            required: 1,
            found: 0,
        });
    };

    debug!(report_id = %first.report_id, audits = audits.len(), "Computing trends");

    let score_progression = audits
        .iter()
        .map(|audit| TrendPoint {
            period: period(audit),
            score: audit.score,
            total_issues: audit.issues.len(),
            issues_by_severity: audit.severity_counts(),
        })
        .collect();

    let category_trends = RuleCategory::ALL
        .iter()
        .map(|&category| CategoryTrend {
            category,
            data: audits
                .iter()
                .map(|audit| CategoryCount {
                    period: period(audit),
                    count: audit.issues_in(category),
                })
                .collect(),
        })
        .collect();

    let (improvements, regressions) = if audits.len() >= 2 {
        category_changes(first, last)
    } else {
        (Vec::new(), Vec::new())
    };

    let total_improvement = last.score - first.score;
    let summary = TrendSummary {
        average_score: audits.iter().map(|a| a.score).sum::<f64>() / audits.len() as f64,
        best_score: audits.iter().map(|a| a.score).fold(f64::MIN, f64::max),
        worst_score: audits.iter().map(|a| a.score).fold(f64::MAX, f64::min),
        trend: Trend::from_delta(total_improvement),
        total_improvement,
    };

    Ok(TrendsResult {
        report_id: first.report_id.clone(),
        total_audits: audits.len(),
        date_range: DateRange {
            from: first.created_at,
            to: last.created_at,
        },
        score_progression,
        category_trends,
        recommendations: recommendations(&summary, &improvements, &regressions),
        improvements,
        regressions,
        summary,
    })
}

/// Audits ordered by creation time; ties keep input order
pub(crate) fn sorted_by_date(history: &[AuditResult]) -> Vec<&AuditResult> {
    let mut audits: Vec<&AuditResult> = history.iter().collect();
    audits.sort_by_key(|audit| audit.created_at);
    audits
}

fn period(audit: &AuditResult) -> String {
    audit.created_at.format(PERIOD_FORMAT).to_string()
}

fn category_changes(
    first: &AuditResult,
    last: &AuditResult,
) -> (Vec<CategoryImprovement>, Vec<CategoryRegression>) {
    let mut improvements = Vec::new();
    let mut regressions = Vec::new();

    for category in RuleCategory::ALL {
        let first_count = first.issues_in(category);
        if first_count == 0 {
            continue;
        }
        let last_count = last.issues_in(category);
        let change = (first_count as f64 - last_count as f64) / first_count as f64 * 100.0;

        if change > CATEGORY_CHANGE_THRESHOLD {
            improvements.push(CategoryImprovement {
                category,
                improvement: change,
                message: format!("{change:.0}% fewer {category} issues"),
            });
        } else if change < -CATEGORY_CHANGE_THRESHOLD {
            regressions.push(CategoryRegression {
                category,
                regression: change.abs(),
                message: format!("{:.0}% more {category} issues", change.abs()),
            });
        }
    }

    (improvements, regressions)
}

fn recommendations(
    summary: &TrendSummary,
    improvements: &[CategoryImprovement],
    regressions: &[CategoryRegression],
) -> Vec<String> {
    let mut out = Vec::new();

    match summary.trend {
        Trend::Improving => out.push(format!(
            "Strong progress: score improved {:.1} points over time.",
            summary.total_improvement
        )),
        Trend::Declining => out.push(format!(
            "Attention: score dropped {:.1} points. Review the quality process.",
            summary.total_improvement.abs()
        )),
        Trend::Stable => {}
    }

    if !improvements.is_empty() {
        let names: Vec<&str> = improvements.iter().map(|i| i.category.as_str()).collect();
        out.push(format!("Improving categories: {}", names.join(", ")));
    }

    if !regressions.is_empty() {
        let names: Vec<&str> = regressions.iter().map(|r| r.category.as_str()).collect();
        out.push(format!("Categories needing attention: {}", names.join(", ")));
    }

    if summary.average_score < REVIEW_BELOW_AVERAGE {
        out.push(
            "Average score below 75%. Consider a systematic review of the reporting process."
                .to_string(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use qivo_types::{AuditIssue, Severity};

    fn issue(code: &str, category: RuleCategory, severity: Severity) -> AuditIssue {
        AuditIssue {
            code: code.into(),
            category,
            severity,
            section: "Test".into(),
            message: format!("{code} failed"),
            weight: 5,
        }
    }

    fn audit(day: i64, score: f64, issues: Vec<AuditIssue>) -> AuditResult {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        AuditResult {
            audit_id: format!("audit-{day}"),
            report_id: "report-1".into(),
            score,
            total_rules: 20,
            passed_rules: 20 - issues.len(),
            failed_rules: issues.len(),
            issues,
            created_at: base + Duration::days(day),
        }
    }

    fn trend_of(first: f64, last: f64) -> Trend {
        let history = vec![audit(0, first, vec![]), audit(1, last, vec![])];
        compute_trends(&history).unwrap().summary.trend
    }

    #[test]
    fn test_empty_history_is_rejected() {
        assert_eq!(
            compute_trends(&[]).unwrap_err(),
            TrendError::InsufficientHistory {
                required: 1,
                found: 0
            }
        );
    }

    #[test]
    fn test_single_audit_is_stable() {
        let result = compute_trends(&[audit(0, 62.0, vec![])]).unwrap();
        assert_eq!(result.summary.trend, Trend::Stable);
        assert_eq!(result.summary.total_improvement, 0.0);
        assert!(result.improvements.is_empty());
        assert_eq!(result.date_range.from, result.date_range.to);
    }

    #[test]
    fn test_trend_boundaries() {
        assert_eq!(trend_of(80.0, 85.0), Trend::Stable);
        assert_eq!(trend_of(80.0, 85.01), Trend::Improving);
        assert_eq!(trend_of(80.0, 74.9), Trend::Declining);
        assert_eq!(trend_of(80.0, 75.0), Trend::Stable);
    }

    #[test]
    fn test_history_is_sorted_before_analysis() {
        let history = vec![
            audit(2, 90.0, vec![]),
            audit(0, 60.0, vec![]),
            audit(1, 75.0, vec![]),
        ];
        let result = compute_trends(&history).unwrap();
        let scores: Vec<f64> = result.score_progression.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![60.0, 75.0, 90.0]);
        assert_eq!(result.summary.trend, Trend::Improving);
        assert_eq!(result.summary.total_improvement, 30.0);
        assert_eq!(result.summary.best_score, 90.0);
        assert_eq!(result.summary.worst_score, 60.0);
        assert_eq!(result.summary.average_score, 75.0);
        assert_eq!(result.score_progression[0].period, "2025-01-01");
    }

    #[test]
    fn test_category_changes() {
        let history = vec![
            audit(
                0,
                50.0,
                vec![
                    issue("G1", RuleCategory::Geo, Severity::High),
                    issue("G2", RuleCategory::Geo, Severity::Low),
                    issue("N1", RuleCategory::Norma, Severity::Medium),
                ],
            ),
            audit(
                1,
                55.0,
                vec![
                    issue("G1", RuleCategory::Geo, Severity::High),
                    issue("N1", RuleCategory::Norma, Severity::Medium),
                    issue("E1", RuleCategory::Esg, Severity::Critical),
                ],
            ),
        ];
        let result = compute_trends(&history).unwrap();

        assert_eq!(result.improvements.len(), 1);
        assert_eq!(result.improvements[0].category, RuleCategory::Geo);
        assert_eq!(result.improvements[0].improvement, 50.0);
        // esg started at zero, so no percentage
        assert!(result.regressions.is_empty());

        let esg = result
            .category_trends
            .iter()
            .find(|t| t.category == RuleCategory::Esg)
            .unwrap();
        let counts: Vec<usize> = esg.data.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 1]);

        assert_eq!(result.score_progression[1].issues_by_severity.critical, 1);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r == "Improving categories: geo"));
    }

    #[test]
    fn test_regression_reported() {
        let history = vec![
            audit(0, 80.0, vec![issue("N1", RuleCategory::Norma, Severity::Low)]),
            audit(
                1,
                70.0,
                vec![
                    issue("N1", RuleCategory::Norma, Severity::Low),
                    issue("N2", RuleCategory::Norma, Severity::Low),
                ],
            ),
        ];
        let result = compute_trends(&history).unwrap();
        assert_eq!(result.regressions[0].regression, 100.0);
        assert_eq!(result.regressions[0].message, "100% more norma issues");
        assert_eq!(result.summary.trend, Trend::Declining);
        assert!(result.recommendations[0].starts_with("Attention: score dropped 10.0 points"));
    }

    #[test]
    fn test_json_shape() {
        let result = compute_trends(&[audit(0, 62.0, vec![])]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["dateRange"]["from"].is_string());
        assert_eq!(json["summary"]["trend"], "stable");
        assert!(json["scoreProgression"][0]["issuesBySeverity"].is_object());
        assert_eq!(json["categoryTrends"][4]["category"], "satelite");
    }
}
