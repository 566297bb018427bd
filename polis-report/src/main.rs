//! polis-report - build one conversation report and print it as JSON
//!
//! Report documents come from the backend API, or from a fixture directory
//! with `--fixtures`. The aggregate is written to stdout; logs go to stderr
//! (or the configured log file).

use anyhow::{Context, Result};
use clap::Parser;
use polis_common::config::{LoggingConfig, ReportConfig};
use polis_common::Tid;
use polis_report::{ConversationAggregate, FixtureSource, HttpSource, ReportBuilder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "polis-report", version, about = "Build a conversation report aggregate")]
struct Args {
    /// Conversation to report on
    #[arg(long, env = "POLIS_CONVERSATION_ID")]
    conversation_id: String,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend API origin (overrides config and environment)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Read report documents from this directory instead of the API
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    aggregate: &'a ConversationAggregate,
    display_ids: BTreeMap<Tid, String>,
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, origin) =
        ReportConfig::resolve_with_origin(args.config.as_deref(), args.api_base_url.as_deref())?;
    init_logging(&config.logging)?;

    info!("Starting polis-report v{}", env!("CARGO_PKG_VERSION"));
    origin.log();

    let aggregate = match &args.fixtures {
        Some(dir) => {
            info!("Reading report documents from {}", dir.display());
            ReportBuilder::new(FixtureSource::new(dir))
                .build(&args.conversation_id)
                .await?
        }
        None => {
            info!("Fetching report documents from {}", config.api_base_url);
            ReportBuilder::new(HttpSource::new(&config)?)
                .build(&args.conversation_id)
                .await?
        }
    };

    let output = ReportOutput {
        display_ids: aggregate.display_ids(),
        aggregate: &aggregate,
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);

    Ok(())
}
