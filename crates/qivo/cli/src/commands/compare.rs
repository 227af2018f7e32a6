//! Audit comparison command

use crate::commands::{history_report_id, Context};
use crate::error::{CliError, CliResult};
use crate::input::load_history;
use crate::output::{print_single, print_table, OutputFormat};
use clap::Args;
use colored::*;
use qivo_trends::ComparisonResult;
use qivo_types::AuditIssue;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Audit history file (JSON array of audits)
    pub history: PathBuf,

    /// Report to compare; required when the history holds several reports
    #[arg(long)]
    pub report_id: Option<String>,

    /// Earlier audit id; defaults to the second most recent audit
    #[arg(long, requires = "current")]
    pub previous: Option<String>,

    /// Later audit id; defaults to the most recent audit
    #[arg(long, requires = "previous")]
    pub current: Option<String>,
}

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl IssueRow {
    fn new(status: &'static str, issue: &AuditIssue) -> Self {
        Self {
            status,
            code: issue.code.clone(),
            category: issue.category.to_string(),
            severity: issue.severity.to_string(),
            message: issue.message.clone(),
        }
    }
}

/// Execute the compare command
pub async fn execute(args: CompareArgs, ctx: &Context) -> CliResult<()> {
    let history = load_history(&args.history)?;
    let report_id = history_report_id(&history, args.report_id)?;
    let (service, _) = ctx.service(&history).await?;

    let result = match (args.previous, args.current) {
        (Some(previous), Some(current)) => {
            service.compare(&report_id, &previous, &current).await?
        }
        (None, None) => service.compare_latest(&report_id).await?,
        _ => {
            return Err(CliError::InvalidInput(
                "--previous and --current go together".to_string(),
            ))
        }
    };

    if ctx.format == OutputFormat::Table {
        print_comparison(&result);
        Ok(())
    } else {
        print_single(&result, ctx.format)
    }
}

fn print_comparison(result: &ComparisonResult) {
    println!("{} {}", "Report:".bold(), result.report_id);
    for insight in &result.insights {
        println!("  • {insight}");
    }
    println!();

    let comparison = &result.comparison;
    let rows: Vec<IssueRow> = comparison
        .resolved_issues
        .iter()
        .map(|issue| IssueRow::new("resolved", issue))
        .chain(comparison.new_issues.iter().map(|issue| IssueRow::new("new", issue)))
        .chain(
            comparison
                .persistent_issues
                .iter()
                .map(|issue| IssueRow::new("persistent", issue)),
        )
        .collect();
    print_table(rows);
}
