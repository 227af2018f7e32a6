//! KRCI audit command

use crate::commands::{as_of_or_today, report_id_for, resolve_standard, Context};
use crate::error::CliResult;
use crate::input::{load_history, load_report, save_json};
use crate::output::{colorize_score, print_single, print_success, print_table, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use colored::*;
use qivo_audit::{audit_summary, ScanMode, ScanReport};
use qivo_types::StandardId;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Canonical report or standard document (JSON)
    pub input: PathBuf,

    /// Rule set to audit against; defaults to the document's own standard
    #[arg(short, long)]
    pub standard: Option<StandardId>,

    /// Scan depth (light, full, deep); defaults to the configured mode
    #[arg(short, long)]
    pub mode: Option<ScanMode>,

    /// Evaluation date for staleness checks (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Report id recorded in the audit; defaults to the input file stem
    #[arg(long)]
    pub report_id: Option<String>,

    /// Audit history file to append the result to
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Execute the audit command
pub async fn execute(args: AuditArgs, ctx: &Context) -> CliResult<()> {
    let input = load_report(&args.input)?;
    let report = input.canonical();
    let standard = resolve_standard(args.standard, &input, &report)?;
    let report_id = report_id_for(&args.input, args.report_id);

    let mut history = match &args.history {
        Some(path) => load_history(path)?,
        None => Vec::new(),
    };

    let (service, store) = ctx.service(&history).await?;
    store.put_report(report_id.clone(), report).await;
    let scan = service
        .audit_report(&report_id, standard, args.mode, as_of_or_today(args.as_of))
        .await?;

    if ctx.format == OutputFormat::Table {
        print_scan(&scan);
    } else {
        print_single(&scan, ctx.format)?;
    }

    if let Some(path) = &args.history {
        history.push(scan.audit.clone());
        save_json(path, &history)?;
        if ctx.format == OutputFormat::Table {
            print_success(&format!(
                "Recorded audit {} in {}",
                scan.audit.audit_id,
                path.display()
            ));
        }
    }

    Ok(())
}

fn print_scan(scan: &ScanReport) {
    println!(
        "{} {} ({} scan)",
        "Standard:".bold(),
        scan.standard.display_name(),
        scan.mode
    );
    println!("{}", audit_summary(&scan.audit));
    println!();

    print_table(
        scan.category_scores
            .iter()
            .map(|(category, score)| CategoryRow {
                category: category.to_string(),
                score: colorize_score(*score).to_string(),
            })
            .collect(),
    );

    if !scan.recommendations.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for recommendation in &scan.recommendations {
            println!("  - {recommendation}");
        }
    }
}
