//! Rule catalog listing

use crate::commands::{as_of_or_today, Context};
use crate::error::CliResult;
use crate::output::{print_single, print_table, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use colored::*;
use qivo_audit::{catalog, catalog_stats, CatalogContext, CatalogStats, RuleDescriptor, ScanMode};
use qivo_types::StandardId;
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Standard whose catalog to list
    #[arg(short, long)]
    pub standard: StandardId,

    /// Only rules run by this scan mode; defaults to the whole catalog
    #[arg(short, long, default_value = "deep")]
    pub mode: ScanMode,

    /// Evaluation date the catalog is built for (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RulesOutput {
    standard: StandardId,
    mode: ScanMode,
    rules: Vec<RuleDescriptor>,
    stats: CatalogStats,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Weight")]
    weight: u32,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Section")]
    section: &'static str,
}

/// Execute the rules command
pub fn execute(args: RulesArgs, ctx: &Context) -> CliResult<()> {
    let context = CatalogContext::new(as_of_or_today(args.as_of))
        .with_stale_after_months(ctx.config.audit.stale_after_months);

    let rules: Vec<RuleDescriptor> = catalog(args.standard, &context)
        .iter()
        .map(|rule| rule.descriptor().clone())
        .filter(|descriptor| args.mode.includes(descriptor.mode))
        .collect();

    let output = RulesOutput {
        standard: args.standard,
        mode: args.mode,
        rules,
        stats: catalog_stats(args.standard, &context),
    };

    if ctx.format != OutputFormat::Table {
        return print_single(&output, ctx.format);
    }

    println!(
        "{} {} ({} rules in {} mode)\n",
        "Catalog:".bold(),
        output.standard.display_name(),
        output.rules.len(),
        output.mode
    );
    print_table(
        output
            .rules
            .iter()
            .map(|rule| RuleRow {
                code: rule.code,
                category: rule.category.to_string(),
                severity: rule.severity.to_string(),
                weight: rule.weight,
                mode: rule.mode.to_string(),
                section: rule.section,
            })
            .collect(),
    );
    Ok(())
}
