//! Weighted audit engine
//!
//! `score = 100 * Σ weight(passed) / Σ weight(all)`. Rule faults are contained: an
//! error or panic inside `evaluate` becomes a failed rule with a generic message and
//! the remaining rules still run. Issues always follow rule registration order, for
//! both the sequential and the concurrent path.

use crate::rule::{AuditRule, RuleOutcome};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use qivo_types::{AuditIssue, AuditResult, CanonicalReport};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message recorded for a rule that errored or panicked
pub const EVALUATION_ERROR: &str = "Rule evaluation error";

/// Evaluate `rules` against `report` on the calling thread
pub fn run_audit(
    report_id: &str,
    report: &CanonicalReport,
    rules: &[Arc<dyn AuditRule>],
) -> AuditResult {
    debug!(report_id, rules = rules.len(), "Starting audit");

    let outcomes: Vec<RuleOutcome> = rules
        .iter()
        .map(|rule| evaluate_contained(rule.as_ref(), report))
        .collect();

    assemble(report_id, rules, &outcomes, Utc::now())
}

/// Evaluate `rules` concurrently on the blocking pool
///
/// Produces the same issues, counts and score as [`run_audit`].
pub async fn run_audit_concurrent(
    report_id: &str,
    report: Arc<CanonicalReport>,
    rules: &[Arc<dyn AuditRule>],
) -> AuditResult {
    debug!(
        report_id,
        rules = rules.len(),
        "Starting concurrent audit"
    );

    let tasks = rules.iter().map(|rule| {
        let rule = Arc::clone(rule);
        let report = Arc::clone(&report);
        tokio::task::spawn_blocking(move || evaluate_contained(rule.as_ref(), &report))
    });

    // join_all yields in submission order regardless of completion order
    let outcomes: Vec<RuleOutcome> = join_all(tasks)
        .await
        .into_iter()
        .zip(rules)
        .map(|(joined, rule)| {
            joined.unwrap_or_else(|err| {
                warn!(code = rule.code(), error = %err, "Rule task did not complete");
                RuleOutcome::fail(EVALUATION_ERROR)
            })
        })
        .collect();

    assemble(report_id, rules, &outcomes, Utc::now())
}

/// Run one rule, converting errors and panics into a failed outcome
pub fn evaluate_contained(rule: &dyn AuditRule, report: &CanonicalReport) -> RuleOutcome {
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(report))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            warn!(code = rule.code(), error = %err, "Rule returned an error");
            RuleOutcome::fail(EVALUATION_ERROR)
        }
        Err(_) => {
            warn!(code = rule.code(), "Rule panicked during evaluation");
            RuleOutcome::fail(EVALUATION_ERROR)
        }
    }
}

/// Fold per-rule outcomes into an [`AuditResult`]
///
/// `outcomes[i]` must belong to `rules[i]`.
pub fn assemble(
    report_id: &str,
    rules: &[Arc<dyn AuditRule>],
    outcomes: &[RuleOutcome],
    created_at: DateTime<Utc>,
) -> AuditResult {
    let tally = rules.iter().zip(outcomes).fold(
        Tally::default(),
        |tally, (rule, outcome)| tally.record(rule.as_ref(), outcome),
    );

    let result = AuditResult {
        audit_id: Uuid::new_v4().to_string(),
        report_id: report_id.to_string(),
        score: tally.score(),
        total_rules: rules.len(),
        passed_rules: tally.passed,
        failed_rules: tally.issues.len(),
        issues: tally.issues,
        created_at,
    };

    info!(
        report_id,
        audit_id = %result.audit_id,
        score = result.score,
        passed = result.passed_rules,
        failed = result.failed_rules,
        "Audit complete"
    );

    result
}

#[derive(Debug, Default)]
struct Tally {
    total_weight: u64,
    passed_weight: u64,
    passed: usize,
    issues: Vec<AuditIssue>,
}

impl Tally {
    fn record(mut self, rule: &dyn AuditRule, outcome: &RuleOutcome) -> Self {
        let weight = u64::from(rule.weight());
        self.total_weight += weight;

        if outcome.passed {
            self.passed_weight += weight;
            self.passed += 1;
        } else {
            self.issues.push(AuditIssue {
                code: rule.code().to_string(),
                category: rule.category(),
                severity: rule.severity(),
                section: rule.section().to_string(),
                message: outcome.message.clone(),
                weight: rule.weight(),
            });
        }
        self
    }

    /// Zero when the rule set carries no weight
    fn score(&self) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        100.0 * self.passed_weight as f64 / self.total_weight as f64
    }
}
