//! Sift CLI
//!
//! Reconcile scraped social-network profiles against a person description.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sift_core::{FailurePolicy, ScrapingResponse, SiftConfig, UserProfile};
use sift_runtime::Aggregator;

#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about = "Sift: match scraped profiles to a person", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a scraping response down to likely matches
    Analyze {
        /// Scraping response JSON
        #[arg(short, long)]
        scraping: PathBuf,

        /// User profile JSON
        #[arg(short, long)]
        profile: PathBuf,

        /// Output file (default: analysis_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-matcher timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Number of matcher workers
        #[arg(long)]
        workers: Option<usize>,

        /// Return partial results when a matcher fails
        #[arg(long)]
        partial: bool,

        /// Match handles and names case-insensitively
        #[arg(long)]
        ignore_case: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            scraping,
            profile,
            output,
            timeout_ms,
            workers,
            partial,
            ignore_case,
        } => {
            let mut config = config;
            if let Some(ms) = timeout_ms {
                config.runtime.matcher_timeout_ms = Some(ms);
            }
            if let Some(workers) = workers {
                config.runtime.pool_size = workers;
            }
            if partial {
                config.runtime.failure_policy = FailurePolicy::Partial;
            }
            if ignore_case {
                config.matching.case_sensitive_identity = false;
            }
            run_analyze(&scraping, &profile, output, config).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SiftConfig> {
    match path {
        Some(path) => SiftConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(SiftConfig::default()),
    }
}

async fn run_analyze(
    scraping: &Path,
    profile: &Path,
    output: Option<PathBuf>,
    config: SiftConfig,
) -> Result<()> {
    let response = fs::read_to_string(scraping)
        .with_context(|| format!("reading {}", scraping.display()))?;
    let response = ScrapingResponse::from_json(&response)
        .with_context(|| format!("parsing {}", scraping.display()))?;

    let profile_json = fs::read_to_string(profile)
        .with_context(|| format!("reading {}", profile.display()))?;
    let user = UserProfile::from_json(&profile_json)
        .with_context(|| format!("parsing {}", profile.display()))?;

    info!("Searching for {}", user.full_name());

    let aggregator = Aggregator::new(config)?;
    let analysis = aggregator.analyze(&response, &user).await?;

    for failure in &analysis.failures {
        eprintln!("⚠️  {} skipped: {}", failure.network, failure.error);
    }

    let output_path = output.unwrap_or_else(|| {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
        PathBuf::from(format!("analysis_{}.json", timestamp))
    });

    let rendered = serde_json::to_string_pretty(&analysis.result)?;
    fs::write(&output_path, rendered)
        .with_context(|| format!("writing {}", output_path.display()))?;

    info!(
        "{} likely matches written to {}",
        analysis.result.total_matches(),
        output_path.display()
    );

    Ok(())
}
