//! Trend analysis command

use crate::commands::{history_report_id, Context};
use crate::error::CliResult;
use crate::input::load_history;
use crate::output::{colorize_score, print_single, print_table, print_warning, OutputFormat};
use clap::Args;
use colored::*;
use qivo_trends::{AuditStatistics, TrendsResult};
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Debug, Args)]
pub struct TrendsArgs {
    /// Audit history file (JSON array of audits)
    pub history: PathBuf,

    /// Report to analyze; required when the history holds several reports
    #[arg(long)]
    pub report_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendsOutput {
    trends: TrendsResult,
    statistics: AuditStatistics,
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Issues")]
    issues: usize,
    #[tabled(rename = "Critical")]
    critical: usize,
    #[tabled(rename = "High")]
    high: usize,
}

/// Execute the trends command
pub async fn execute(args: TrendsArgs, ctx: &Context) -> CliResult<()> {
    let history = load_history(&args.history)?;
    let report_id = history_report_id(&history, args.report_id)?;

    let (service, _) = ctx.service(&history).await?;
    let output = TrendsOutput {
        trends: service.trends(&report_id).await?,
        statistics: service.statistics(&report_id).await?,
    };

    if ctx.format == OutputFormat::Table {
        print_trends(&output);
        Ok(())
    } else {
        print_single(&output, ctx.format)
    }
}

fn print_trends(output: &TrendsOutput) {
    let trends = &output.trends;
    let summary = &trends.summary;

    println!("{} {}", "Report:".bold(), trends.report_id);
    println!(
        "Audits: {}  Trend: {}  Change: {:+.1} points",
        trends.total_audits, summary.trend, summary.total_improvement
    );
    println!(
        "Average: {}  Best: {}  Worst: {}",
        colorize_score(summary.average_score),
        colorize_score(summary.best_score),
        colorize_score(summary.worst_score)
    );
    println!(
        "Most common issue: {} / {}\n",
        output.statistics.most_common_category, output.statistics.most_common_severity
    );

    print_table(
        trends
            .score_progression
            .iter()
            .map(|point| PointRow {
                period: point.period.clone(),
                score: format!("{:.1}%", point.score),
                issues: point.total_issues,
                critical: point.issues_by_severity.critical,
                high: point.issues_by_severity.high,
            })
            .collect(),
    );

    for regression in &trends.regressions {
        print_warning(&regression.message);
    }

    if !trends.recommendations.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for recommendation in &trends.recommendations {
            println!("  - {recommendation}");
        }
    }
}
