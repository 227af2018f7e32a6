//! Plain-text audit summary

use qivo_types::AuditResult;

/// Render a short plain-text summary of an audit
pub fn audit_summary(result: &AuditResult) -> String {
    let mut lines = vec![
        "KRCI Audit Complete".to_string(),
        String::new(),
        format!("Score: {:.1}%", result.score),
        format!("Rules checked: {}", result.total_rules),
        format!("Passed: {}", result.passed_rules),
        format!("Failed: {}", result.failed_rules),
        String::new(),
    ];

    if result.issues.is_empty() {
        lines.push("No KRCI issues found. Report is fully compliant.".to_string());
    } else {
        lines.push("KRCI issues:".to_string());
        lines.extend(result.issues.iter().enumerate().map(|(i, issue)| {
            format!(
                "{}. [{}] {}: {} ({})",
                i + 1,
                issue.code,
                issue.section,
                issue.message,
                issue.severity
            )
        }));
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}
