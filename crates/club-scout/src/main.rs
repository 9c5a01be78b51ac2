//! Club scout interactive CLI.

use anyhow::{Context, Result};
use clap::Parser;
use club_scout::{build_context, HttpTransport, Menu, TerminalConsole, TerminalSink};
use shared::{Config, ConfigSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of concurrent club checks per country
    #[arg(short = 'w', long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let (mut config, source) = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(workers) = args.workers {
        config.scout.workers = Some(workers);
        config.validate().context("Invalid --workers")?;
    }

    shared::logging::init(shared::logging::from_config(&config, "club-scout", args.verbose))?;

    info!("Club scout starting");
    match source {
        ConfigSource::File => {
            info!(config_file = %args.config.display(), "Loaded configuration")
        }
        ConfigSource::Defaults => warn!(
            config_file = %args.config.display(),
            "Config file not found, using defaults"
        ),
    }

    let timeout = config.scout.request_timeout_secs.map(Duration::from_secs);
    let transport = HttpTransport::new(&config.scout.user_agent, timeout)
        .context("Failed to create HTTP transport")?;

    let workers = config.scout.worker_count();
    info!(workers = workers, base_url = %config.scout.base_url, "Pipeline ready");

    let context = build_context(&config.scout, Arc::new(transport), Arc::new(TerminalSink), workers);
    let mut menu = Menu::new(TerminalConsole::new(), context);

    menu.run().await.context("Club search aborted")?;

    info!("Club scout finished");
    Ok(())
}
