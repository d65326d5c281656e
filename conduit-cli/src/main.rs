//! Conduit CLI - manifest tooling
//!
//! # Usage
//!
//! ```bash
//! # Print identity, entities and actions of a manifest
//! conduit inspect conduit_manifest.json
//!
//! # Check a manifest; exits with status 1 when issues are found
//! conduit validate conduit_manifest.json
//!
//! # Use the manifest path from a config file, JSON output
//! conduit --config conduit.toml --output-format json inspect
//! ```

mod commands;
mod context;
mod output;

use clap::{Parser, Subcommand};
use commands::{inspect::InspectArgs, validate::ValidateArgs};
use context::CliContext;
use output::{OutputFormat, OutputFormatter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conduit")]
#[command(version)]
#[command(about = "Conduit - intent manifest tooling", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "CONDUIT_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, plain)
    #[arg(short, long, global = true, default_value = "table")]
    output_format: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the content of a manifest
    Inspect(InspectArgs),

    /// Check a manifest for duplicate names and keys
    Validate(ValidateArgs),
}

/// Route `log` records from the library into a stderr subscriber.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Warning: log bridge not installed: {}", e);
    }
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: logging not initialized: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_format: OutputFormat = cli.output_format.parse().unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using table format.", e);
        OutputFormat::Table
    });
    let formatter = OutputFormatter::new(output_format);

    let ctx = match cli.config {
        Some(path) => CliContext::new(path),
        None => CliContext::with_defaults(),
    };
    let mut ctx = match ctx {
        Ok(ctx) => ctx,
        Err(e) => {
            formatter.error(&format!("Error loading configuration: {:#}", e));
            std::process::exit(1);
        }
    };
    ctx.output_format = output_format;
    tracing::debug!("Using config {}", ctx.config_path.display());

    let result = match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(&ctx, args).await,
        Commands::Validate(args) => commands::validate::execute(&ctx, args).await,
    };

    if let Err(e) = result {
        formatter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
