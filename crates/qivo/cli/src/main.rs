//! Qivo CLI - mining technical report conversion, KRCI audits and trends
//!
//! This CLI gives analysts a terminal interface to:
//! - Convert reports between JORC, NI 43-101, PERC, SAMREC and CBRR
//! - Audit a report against the KRCI catalog and keep an audit history
//! - Analyze score trends and compare audits
//! - List rule catalogs and build correction plans

use clap::{Parser, Subcommand};
use qivo_service::{LoggingConfig, ServiceConfig, ServiceError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod input;
mod output;

use commands::{audit, compare, convert, plan, rules, trends, Context};
use error::CliResult;
use output::{print_error, OutputFormat};

/// Qivo CLI application
#[derive(Parser)]
#[command(name = "qivo")]
#[command(about = "Qivo - mining report conversion, KRCI audit and trend analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "QIVO_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, alias = "output", default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, env = "QIVO_LOG_JSON", global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Convert a report into another standard
    Convert(convert::ConvertArgs),

    /// Audit a report against the KRCI catalog
    Audit(audit::AuditArgs),

    /// Analyze the score trend of an audit history
    Trends(trends::TrendsArgs),

    /// Compare two audits of a report
    Compare(compare::CompareArgs),

    /// List the KRCI rule catalog for a standard
    Rules(rules::RulesArgs),

    /// Build a prioritized correction plan for a report
    Plan(plan::PlanArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = ServiceConfig::load(cli.config.as_deref()).map_err(ServiceError::from)?;
    init_tracing(&config.logging, cli.verbose, cli.json_logs);

    let ctx = Context {
        config,
        format: cli.format,
    };

    match cli.command {
        Commands::Convert(args) => convert::execute(args, &ctx),
        Commands::Audit(args) => audit::execute(args, &ctx).await,
        Commands::Trends(args) => trends::execute(args, &ctx).await,
        Commands::Compare(args) => compare::execute(args, &ctx).await,
        Commands::Rules(args) => rules::execute(args, &ctx),
        Commands::Plan(args) => plan::execute(args, &ctx).await,
    }
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
fn init_tracing(logging: &LoggingConfig, verbose: bool, json: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if json || logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
