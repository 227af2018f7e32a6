//! Standard conversion command

use crate::commands::Context;
use crate::error::CliResult;
use crate::input::{load_report, save_json, ReportInput};
use crate::output::{print_single, print_success};
use clap::Args;
use qivo_mappers::{convert, to_standard};
use qivo_types::StandardId;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Canonical report or standard document (JSON)
    pub input: PathBuf,

    /// Target standard (JORC, NI43-101, PERC, SAMREC, CBRR)
    #[arg(short, long)]
    pub to: StandardId,

    /// Write the converted document here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs, ctx: &Context) -> CliResult<()> {
    let input = load_report(&args.input)?;
    let view = match &input {
        ReportInput::Document(source) => convert(source, args.to),
        ReportInput::Canonical(report) => to_standard(args.to, report),
    };

    info!(
        from = input.standard().map_or("canonical", |s| s.id()),
        to = args.to.id(),
        "Converted report"
    );

    match args.out {
        Some(path) => {
            save_json(&path, &view)?;
            print_success(&format!(
                "Wrote {} document to {}",
                args.to.display_name(),
                path.display()
            ));
            Ok(())
        }
        None => print_single(&view, ctx.format),
    }
}
