//! Property tests: comparison set algebra and trend classification.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use qivo_trends::{compare_audits, compute_trends, Trend};
use qivo_types::{AuditIssue, AuditResult, RuleCategory, Severity};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_codes() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("KRCI-0[0-2][0-9]", 0..12)
}

fn audit(day: i64, score: f64, codes: &BTreeSet<String>) -> AuditResult {
    let issues: Vec<AuditIssue> = codes
        .iter()
        .map(|code| AuditIssue {
            code: code.clone(),
            category: RuleCategory::Geo,
            severity: Severity::Medium,
            section: "Test".into(),
            message: format!("{code} at day {day}"),
            weight: 5,
        })
        .collect();

    AuditResult {
        audit_id: format!("audit-{day}"),
        report_id: "report-1".into(),
        score,
        total_rules: 40,
        passed_rules: 40 - issues.len(),
        failed_rules: issues.len(),
        issues,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
    }
}

fn code_set(issues: &[AuditIssue]) -> BTreeSet<String> {
    issues.iter().map(|i| i.code.clone()).collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn comparison_partitions_issue_codes(
        before in arb_codes(),
        after in arb_codes(),
        previous_score in 0.0f64..=100.0,
        current_score in 0.0f64..=100.0
    ) {
        let previous = audit(0, previous_score, &before);
        let current = audit(1, current_score, &after);
        let result = compare_audits(&previous, &current, &[]);
        let c = &result.comparison;

        let resolved = code_set(&c.resolved_issues);
        let new = code_set(&c.new_issues);
        let persistent = code_set(&c.persistent_issues);

        let union = |a: &BTreeSet<String>, b: &BTreeSet<String>| -> BTreeSet<String> {
            a.union(b).cloned().collect()
        };
        prop_assert_eq!(union(&resolved, &persistent), before.clone());
        prop_assert_eq!(union(&new, &persistent), after.clone());
        prop_assert!(resolved.is_disjoint(&new));
        prop_assert_eq!(c.score_delta, current_score - previous_score);
        prop_assert_eq!(c.issues_delta, after.len() as i64 - before.len() as i64);
        prop_assert!(c.persistent_issues.iter().all(|i| i.message.ends_with("day 1")));
    }

    #[test]
    fn trend_follows_first_and_last_scores(
        scores in proptest::collection::vec(0.0f64..=100.0, 1..10)
    ) {
        let empty = BTreeSet::new();
        // reversed input order; the engine sorts by date
        let history: Vec<AuditResult> = scores
            .iter()
            .enumerate()
            .rev()
            .map(|(day, &score)| audit(day as i64, score, &empty))
            .collect();
        let result = compute_trends(&history).unwrap();

        let delta = scores[scores.len() - 1] - scores[0];
        prop_assert_eq!(result.summary.total_improvement, delta);
        prop_assert_eq!(result.summary.trend, Trend::from_delta(delta));
        prop_assert!(result.summary.worst_score <= result.summary.average_score + 1e-9);
        prop_assert!(result.summary.average_score <= result.summary.best_score + 1e-9);
        prop_assert_eq!(result.score_progression.len(), scores.len());
    }
}
