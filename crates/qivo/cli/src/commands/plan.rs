//! Correction plan command

use crate::commands::{as_of_or_today, report_id_for, resolve_standard, Context};
use crate::error::CliResult;
use crate::input::load_report;
use crate::output::{print_single, OutputFormat};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use qivo_audit::ScanMode;
use qivo_types::StandardId;
use std::path::PathBuf;

/// Plan export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanExport {
    Markdown,
    Csv,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
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

    /// Report id recorded in the plan; defaults to the input file stem
    #[arg(long)]
    pub report_id: Option<String>,

    /// Export as Markdown or CSV; table output defaults to Markdown
    #[arg(short, long)]
    pub export: Option<PlanExport>,
}

/// Execute the plan command
pub async fn execute(args: PlanArgs, ctx: &Context) -> CliResult<()> {
    let input = load_report(&args.input)?;
    let report = input.canonical();
    let standard = resolve_standard(args.standard, &input, &report)?;
    let report_id = report_id_for(&args.input, args.report_id);
    let as_of = as_of_or_today(args.as_of);

    let (service, store) = ctx.service(&[]).await?;
    store.put_report(report_id.clone(), report).await;
    service
        .audit_report(&report_id, standard, args.mode, as_of)
        .await?;
    let plan = service.correction_plan(&report_id, standard, as_of).await?;

    let export = match (args.export, ctx.format) {
        (Some(export), _) => export,
        (None, OutputFormat::Table) => PlanExport::Markdown,
        (None, format) => return print_single(&plan, format),
    };

    match export {
        PlanExport::Markdown => print!("{}", plan.to_markdown()),
        PlanExport::Csv => print!("{}", plan.to_csv()),
    }
    Ok(())
}
