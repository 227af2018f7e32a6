//! Correction plans
//!
//! Turns the issues of an audit into a prioritized list of fixes. Each issue gets an
//! estimated fix time (category base time scaled by severity) and a priority in `1..=100`
//! that favors heavy, severe issues that are quick to fix.

use crate::rule::AuditRule;
use chrono::{DateTime, Utc};
use qivo_types::{AuditIssue, AuditResult, RuleCategory, Severity, SeverityCounts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Fix-time ceiling for a quick win, in minutes
pub const QUICK_WIN_MAX_MINUTES: u32 = 30;
/// Priority floor for a quick win
pub const QUICK_WIN_MIN_PRIORITY: u32 = 50;
/// Low-severity items below this priority can be deferred
pub const DEFER_BELOW_PRIORITY: u32 = 30;

/// One fix in a correction plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionItem {
    pub rule_code: String,
    pub category: RuleCategory,
    pub section: String,
    pub issue: String,
    pub severity: Severity,
    pub weight: u32,
    /// Urgency in `1..=100`, higher first
    pub priority: u32,
    pub estimated_minutes: u32,
    pub suggested_fix: String,
    pub auto_fix_available: bool,
    pub steps: Vec<String>,
}

impl CorrectionItem {
    fn from_issue(issue: &AuditIssue, recommendation: Option<&str>) -> Self {
        let estimated_minutes = estimate_minutes(issue.category, issue.severity);

        Self {
            rule_code: issue.code.clone(),
            category: issue.category,
            section: issue.section.clone(),
            issue: issue.message.clone(),
            severity: issue.severity,
            weight: issue.weight,
            priority: priority(issue.weight, issue.severity, estimated_minutes),
            estimated_minutes,
            suggested_fix: recommendation
                .map(str::to_string)
                .unwrap_or_else(|| fallback_fix(issue.category).to_string()),
            auto_fix_available: issue.category == RuleCategory::Norma,
            steps: steps(issue.category).iter().map(|s| s.to_string()).collect(),
        }
    }

    fn is_quick_win(&self) -> bool {
        self.estimated_minutes <= QUICK_WIN_MAX_MINUTES && self.priority >= QUICK_WIN_MIN_PRIORITY
    }

    fn is_deferrable(&self) -> bool {
        self.severity == Severity::Low && self.priority < DEFER_BELOW_PRIORITY
    }
}

/// Prioritized fixes for one audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionPlan {
    pub report_id: String,
    pub audit_score: f64,
    pub total_issues: usize,
    pub issues_by_severity: SeverityCounts,
    pub estimated_total_minutes: u32,
    pub priority: Severity,
    /// Every fix, highest priority first
    pub corrections: Vec<CorrectionItem>,
    pub quick_wins: Vec<CorrectionItem>,
    pub must_fix: Vec<CorrectionItem>,
    pub can_defer: Vec<CorrectionItem>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl CorrectionPlan {
    /// Build a plan from an audit and the rules that produced it
    ///
    /// Rules are only consulted for recommendations; issues whose code is not in `rules`
    /// get a category fallback.
    pub fn generate(
        audit: &AuditResult,
        rules: &[Arc<dyn AuditRule>],
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut corrections: Vec<CorrectionItem> = audit
            .issues
            .iter()
            .map(|issue| {
                let recommendation = rules
                    .iter()
                    .find(|rule| rule.code() == issue.code)
                    .and_then(|rule| rule.recommendation());
                CorrectionItem::from_issue(issue, recommendation)
            })
            .collect();

        // stable: ties keep issue order
        corrections.sort_by(|a, b| b.priority.cmp(&a.priority));

        let counts = SeverityCounts::from_issues(&audit.issues);
        let estimated_total_minutes: u32 = corrections.iter().map(|c| c.estimated_minutes).sum();
        let priority = plan_priority(&counts);

        debug!(
            report_id = %audit.report_id,
            corrections = corrections.len(),
            minutes = estimated_total_minutes,
            priority = %priority,
            "Generated correction plan"
        );

        Self {
            report_id: audit.report_id.clone(),
            audit_score: audit.score,
            total_issues: corrections.len(),
            issues_by_severity: counts,
            estimated_total_minutes,
            priority,
            quick_wins: corrections.iter().filter(|c| c.is_quick_win()).cloned().collect(),
            must_fix: corrections
                .iter()
                .filter(|c| c.severity == Severity::Critical)
                .cloned()
                .collect(),
            can_defer: corrections.iter().filter(|c| c.is_deferrable()).cloned().collect(),
            summary: summary(audit.score, &counts, estimated_total_minutes, priority),
            corrections,
            created_at,
        }
    }

    /// Markdown rendering
    pub fn to_markdown(&self) -> String {
        let mut md = vec![
            "# KRCI Correction Plan".to_string(),
            String::new(),
            format!("**Report ID**: {}", self.report_id),
            format!("**KRCI Score**: {:.1}%", self.audit_score),
            format!("**Total Issues**: {}", self.total_issues),
            format!(
                "**Estimated Time**: {}",
                format_minutes(self.estimated_total_minutes)
            ),
            format!("**Priority**: {}", self.priority.as_str().to_uppercase()),
            String::new(),
            "## Summary".to_string(),
            String::new(),
            self.summary.clone(),
            String::new(),
        ];

        if !self.must_fix.is_empty() {
            md.push(format!("## Must Fix ({})", self.must_fix.len()));
            md.push(String::new());
            for (i, item) in self.must_fix.iter().enumerate() {
                md.push(format!("### {}. {} - {}", i + 1, item.rule_code, item.issue));
                md.push(format!("- **Category**: {}", item.category));
                md.push(format!("- **Section**: {}", item.section));
                md.push(format!("- **Estimated Time**: {} min", item.estimated_minutes));
                md.push(format!("- **Suggestion**: {}", item.suggested_fix));
                md.push(String::new());
            }
        }

        if !self.quick_wins.is_empty() {
            md.push(format!("## Quick Wins ({})", self.quick_wins.len()));
            md.push(String::new());
            md.extend(self.quick_wins.iter().enumerate().map(|(i, item)| {
                format!(
                    "{}. **{}**: {} ({} min)",
                    i + 1,
                    item.rule_code,
                    item.issue,
                    item.estimated_minutes
                )
            }));
            md.push(String::new());
        }

        md.push("## All Corrections".to_string());
        md.push(String::new());
        md.push("| # | Code | Issue | Severity | Time | Priority |".to_string());
        md.push("|---|------|-------|----------|------|----------|".to_string());
        md.extend(self.corrections.iter().enumerate().map(|(i, item)| {
            format!(
                "| {} | {} | {} | {} | {}min | {} |",
                i + 1,
                item.rule_code,
                item.issue.replace('|', "\\|"),
                item.severity,
                item.estimated_minutes,
                item.priority
            )
        }));

        let mut out = md.join("\n");
        out.push('\n');
        out
    }

    /// CSV rendering, one row per correction
    pub fn to_csv(&self) -> String {
        let header =
            "Code,Category,Section,Issue,Severity,Weight,Priority,Minutes,AutoFix,Suggestion";
        let rows = self.corrections.iter().map(|item| {
            format!(
                "{},{},{},{},{},{},{},{},{},{}",
                csv_field(&item.rule_code),
                csv_field(item.category.as_str()),
                csv_field(&item.section),
                csv_field(&item.issue),
                csv_field(item.severity.as_str()),
                item.weight,
                item.priority,
                item.estimated_minutes,
                item.auto_fix_available,
                csv_field(&item.suggested_fix)
            )
        });

        std::iter::once(header.to_string())
            .chain(rows)
            .map(|line| line + "\n")
            .collect()
    }
}

/// Minutes to fix an issue of this category and severity
pub fn estimate_minutes(category: RuleCategory, severity: Severity) -> u32 {
    let base: f64 = match category {
        RuleCategory::Tenure => 30.0,
        RuleCategory::Geo => 45.0,
        RuleCategory::Esg => 60.0,
        RuleCategory::Norma => 20.0,
        RuleCategory::Satellite => 40.0,
        RuleCategory::Benchmark => 35.0,
    };
    let factor: f64 = match severity {
        Severity::Critical => 1.5,
        Severity::High => 1.2,
        Severity::Medium => 1.0,
        Severity::Low => 0.7,
    };
    (base * factor).round() as u32
}

/// `clamp(round(weight * multiplier / minutes * 10), 1, 100)`
pub fn priority(weight: u32, severity: Severity, estimated_minutes: u32) -> u32 {
    let multiplier = match severity {
        Severity::Critical => 4.0,
        Severity::High => 3.0,
        Severity::Medium => 2.0,
        Severity::Low => 1.0,
    };
    let raw = f64::from(weight) * multiplier / f64::from(estimated_minutes.max(1));
    ((raw * 10.0).round() as u32).clamp(1, 100)
}

fn plan_priority(counts: &SeverityCounts) -> Severity {
    if counts.critical >= 5 {
        Severity::Critical
    } else if counts.critical >= 2 || counts.high >= 10 {
        Severity::High
    } else if counts.high >= 5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn fallback_fix(category: RuleCategory) -> &'static str {
    match category {
        RuleCategory::Tenure => {
            "Look up the mining title records and add the missing tenure information"
        }
        RuleCategory::Geo => {
            "Review the geological data and add detailed technical descriptions per CRIRSCO"
        }
        RuleCategory::Esg => "Obtain the required environmental licenses and attach copies",
        RuleCategory::Norma => "Review the report against every mandatory section of the standard",
        RuleCategory::Satellite => "Add recent satellite imagery and a change-over-time analysis",
        RuleCategory::Benchmark => "Identify analogous deposits in the literature and compare",
    }
}

fn steps(category: RuleCategory) -> &'static [&'static str] {
    match category {
        RuleCategory::Tenure => &[
            "Open the ANM SIGMINE system",
            "Locate the mining process by number",
            "Extract the required information",
            "Update the tenure section of the report",
            "Verify every value against the source",
        ],
        RuleCategory::Geo => &[
            "Review drilling and sampling data",
            "Consult regional geological maps",
            "Update the technical descriptions",
            "Add bibliographic references",
            "Validate with the responsible geologist",
        ],
        RuleCategory::Esg => &[
            "Identify the required environmental licenses",
            "Consult the environmental agencies (IBAMA, state agencies)",
            "Obtain copies of the licenses",
            "Check validity and conditions",
            "Attach the documents to the report",
        ],
        RuleCategory::Norma => &[
            "Identify the sections the standard requires",
            "Review the compliance checklist",
            "Add the missing content",
            "Format according to the template",
            "Run the audit again",
        ],
        RuleCategory::Satellite => &[
            "Open an imagery platform (Copernicus, NASA)",
            "Download recent images of the area",
            "Analyze changes over time",
            "Compute indices such as NDVI",
            "Add the imagery and analysis to the report",
        ],
        RuleCategory::Benchmark => &[
            "Search the literature for analogous deposits",
            "Identify comparable parameters",
            "Compile the reference data",
            "Build comparison tables",
            "Add the technical references",
        ],
    }
}

fn summary(score: f64, counts: &SeverityCounts, minutes: u32, priority: Severity) -> String {
    let mut text = format!(
        "The report scored {score:.1}% on KRCI and has {} non-conformities. ",
        counts.total()
    );
    if counts.critical > 0 {
        text.push_str(&format!(
            "{} critical issues must be fixed immediately. ",
            counts.critical
        ));
    }
    text.push_str(&format!(
        "Estimated time for a complete correction is {}. ",
        format_minutes(minutes)
    ));
    text.push_str(match priority {
        Severity::Critical => "Urgent action is needed to reach minimum compliance.",
        Severity::High => "Start the corrections as soon as possible.",
        Severity::Medium => "Corrections can be scheduled as time allows.",
        Severity::Low => "Low-priority issues; they can be addressed gradually.",
    });
    text
}

fn format_minutes(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {rest}min")
    } else {
        format!("{rest}min")
    }
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::krci::{rule_set, CatalogContext};
    use crate::scan::ScanMode;
    use chrono::NaiveDate;
    use qivo_types::{CanonicalReport, StandardId};

    fn issue(code: &str, category: RuleCategory, severity: Severity, weight: u32) -> AuditIssue {
        AuditIssue {
            code: code.into(),
            category,
            severity,
            section: "Test".into(),
            message: format!("{code} \"failed\""),
            weight,
        }
    }

    fn audit(issues: Vec<AuditIssue>) -> AuditResult {
        AuditResult {
            audit_id: "a1".into(),
            report_id: "r1".into(),
            score: 42.0,
            total_rules: 30,
            passed_rules: 30 - issues.len(),
            failed_rules: issues.len(),
            issues,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fix_time_and_priority() {
        assert_eq!(estimate_minutes(RuleCategory::Norma, Severity::Critical), 30);
        assert_eq!(estimate_minutes(RuleCategory::Tenure, Severity::Low), 21);
        assert_eq!(estimate_minutes(RuleCategory::Esg, Severity::High), 72);

        // 20 * 4 / 30 * 10 = 26.67
        assert_eq!(priority(20, Severity::Critical, 30), 27);
        assert_eq!(priority(100, Severity::Critical, 1), 100);
        assert_eq!(priority(0, Severity::Low, 60), 1);
    }

    #[test]
    fn test_sorted_and_bucketed() {
        let plan = CorrectionPlan::generate(
            &audit(vec![
                issue("L1", RuleCategory::Geo, Severity::Low, 2),
                issue("C1", RuleCategory::Norma, Severity::Critical, 50),
                issue("H1", RuleCategory::Esg, Severity::High, 10),
            ]),
            &[],
            Utc::now(),
        );

        let codes: Vec<_> = plan.corrections.iter().map(|c| c.rule_code.as_str()).collect();
        assert_eq!(codes, vec!["C1", "H1", "L1"]);
        assert!(plan
            .corrections
            .windows(2)
            .all(|w| w[0].priority >= w[1].priority));

        assert_eq!(plan.must_fix.len(), 1);
        // norma critical: 30 min, priority 67
        assert_eq!(plan.quick_wins[0].rule_code, "C1");
        assert_eq!(plan.can_defer[0].rule_code, "L1");
        assert!(plan.corrections[0].auto_fix_available);
        assert!(!plan.corrections[1].auto_fix_available);
        assert_eq!(plan.estimated_total_minutes, 30 + 72 + 31);
        assert_eq!(plan.priority, Severity::Low);
    }

    #[test]
    fn test_plan_priority_thresholds() {
        let critical = |n: usize| {
            (0..n)
                .map(|i| issue(&format!("C{i}"), RuleCategory::Norma, Severity::Critical, 5))
                .collect::<Vec<_>>()
        };
        let high = |n: usize| {
            (0..n)
                .map(|i| issue(&format!("H{i}"), RuleCategory::Geo, Severity::High, 5))
                .collect::<Vec<_>>()
        };

        let plan = |issues| CorrectionPlan::generate(&audit(issues), &[], Utc::now()).priority;
        assert_eq!(plan(critical(5)), Severity::Critical);
        assert_eq!(plan(critical(2)), Severity::High);
        assert_eq!(plan(high(10)), Severity::High);
        assert_eq!(plan(high(5)), Severity::Medium);
        assert_eq!(plan(high(4)), Severity::Low);
    }

    #[test]
    fn test_recommendations_come_from_rules() {
        let context = CatalogContext::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let rules = rule_set(StandardId::Cbrr, ScanMode::Deep, &context);
        let audit = crate::engine::run_audit("r1", &CanonicalReport::new(), &rules);
        let plan = CorrectionPlan::generate(&audit, &rules, Utc::now());

        let anm = plan
            .corrections
            .iter()
            .find(|c| c.rule_code == "KRCI-T001")
            .unwrap();
        assert!(anm.suggested_fix.contains("ANM process number"));
        assert_eq!(anm.steps.len(), 5);
        assert!(plan.summary.contains("critical issues must be fixed immediately"));
    }

    #[test]
    fn test_unknown_rule_uses_category_fallback() {
        let plan = CorrectionPlan::generate(
            &audit(vec![issue("X1", RuleCategory::Esg, Severity::Medium, 5)]),
            &[],
            Utc::now(),
        );
        assert_eq!(plan.corrections[0].suggested_fix, fallback_fix(RuleCategory::Esg));
    }

    #[test]
    fn test_exports() {
        let plan = CorrectionPlan::generate(
            &audit(vec![issue("C1", RuleCategory::Norma, Severity::Critical, 50)]),
            &[],
            Utc::now(),
        );

        let md = plan.to_markdown();
        assert!(md.starts_with("# KRCI Correction Plan"));
        assert!(md.contains("## Must Fix (1)"));
        assert!(md.contains("| 1 | C1 |"));

        let csv = plan.to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"C1\",\"norma\""));
        assert!(lines[1].contains("\"C1 \"\"failed\"\"\""));
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45min");
        assert_eq!(format_minutes(134), "2h 14min");
    }
}
