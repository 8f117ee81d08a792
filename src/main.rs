//! Speech-Harvest main entry point
//!
//! This is the command-line interface for the speech scraping pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use speech_harvest::config::{load_config_or_default, load_config_with_hash, Config, Target};
use speech_harvest::crawler::{collect_links, extract_texts};
use speech_harvest::output::{load_statistics, print_statistics};
use speech_harvest::{logging, HarvestError, Orchestrator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Speech-Harvest: a resumable presidential speech scraper
///
/// Without a subcommand, runs link collection then content extraction for
/// every configured target, skipping jobs that already completed.
#[derive(Parser, Debug)]
#[command(name = "speech-harvest")]
#[command(version)]
#[command(about = "A resumable presidential speech scraper", long_about = None)]
struct Cli {
    /// Path to the JSON or TOML configuration file
    #[arg(short, long, value_name = "PATH", default_value = "config.json", global = true)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Show the jobs that would run without running them
    #[arg(long, conflicts_with_all = ["reset", "status"])]
    dry_run: bool,

    /// Clear completion state before running
    #[arg(long, conflicts_with_all = ["dry_run", "status"])]
    reset: bool,

    /// Show per-target collection statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "reset"])]
    status: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect speech links for one target (phase 1)
    CollectLinks {
        /// Target identifier from the roster
        target: String,
    },
    /// Extract speech texts for one target (phase 2)
    ExtractTexts {
        /// Target identifier from the roster
        target: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Some(command) => handle_phase(&cli, command).await,
        None => handle_orchestrator(&cli).await,
    }
}

/// Runs a single phase for a single target; the config file must exist
async fn handle_phase(cli: &Cli, command: &Command) -> anyhow::Result<ExitCode> {
    logging::init(cli.verbose, cli.quiet, None)?;

    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", hash);

    match command {
        Command::CollectLinks { target } => {
            let target = resolve_target(&config, target)?;
            let outcome = collect_links(&config, target).await?;
            tracing::info!(
                "Collected {} new links for {} ({} total, {} pages)",
                outcome.new_records,
                target.id,
                outcome.total_records,
                outcome.pages_visited
            );
        }
        Command::ExtractTexts { target } => {
            let target = resolve_target(&config, target)?;
            let outcome = extract_texts(&config, target).await?;
            tracing::info!(
                "Extracted {} texts for {} ({} total, {} failed, {} empty)",
                outcome.extracted,
                target.id,
                outcome.total_records,
                outcome.failed,
                outcome.empty
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Runs the orchestrator, or one of its inspection modes
async fn handle_orchestrator(cli: &Cli) -> anyhow::Result<ExitCode> {
    let (config, hash) = load_config_or_default(&cli.config)
        .with_context(|| format!("load configuration from {}", cli.config.display()))?;

    let log_file = if config.scraping.save_logs && !cli.dry_run && !cli.status {
        Some(config.scraping.log_file.as_path())
    } else {
        None
    };
    logging::init(cli.verbose, cli.quiet, log_file)?;
    log_config_source(&cli.config, hash.as_deref());

    if cli.status {
        let orchestrator = Orchestrator::new(config)?;
        let stats = load_statistics(orchestrator.config(), orchestrator.state())?;
        print_statistics(&stats);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.dry_run {
        let orchestrator = Orchestrator::new(config)?;
        println!("{}", orchestrator.plan());
        return Ok(ExitCode::SUCCESS);
    }

    let mut orchestrator = Orchestrator::new(config)?;
    if cli.reset {
        orchestrator.reset()?;
    }

    let summary = orchestrator.run_all().await?;
    Ok(ExitCode::from(summary.exit_code()))
}

fn resolve_target<'a>(config: &'a Config, id: &str) -> Result<&'a Target, HarvestError> {
    config
        .target(id)
        .ok_or_else(|| HarvestError::UnknownTarget(id.to_string()))
}

fn log_config_source(path: &Path, hash: Option<&str>) {
    match hash {
        Some(hash) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        None => tracing::warn!("Config file {} not found. Using defaults.", path.display()),
    }
}
