//! `fourd-harvest` command line entry
//!
//! Usage:
//!   fourd-harvest                              # fetch, extract, archive
//!   fourd-harvest --input saved.html --dry-run # offline check, no writes
//!   fourd-harvest --date 2026-02-25 --output-dir /tmp/data
//!
//! The exit status is non-zero only when the run could not happen at all
//! (bad configuration, fetch failure, archive not writable). Missing or
//! unknown operators are reported in the log.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use fourd_harvest_lib::application::{HarvestService, HarvestUseCase};
use fourd_harvest_lib::infrastructure::parsing::processing_date;
use fourd_harvest_lib::infrastructure::{
    AppConfig, ConfigManager, DocumentSource, FileDocumentSource, FsArchiveStore, HttpClient,
    HttpClientConfig, HttpDocumentSource, init_logging_with_config,
};

/// Harvest 4D lottery results into a JSON archive
#[derive(Parser, Debug)]
#[command(name = "fourd-harvest", version)]
#[command(about = "Extract per-operator 4D results into canonical JSON archives")]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, short = 'c', env = "FOURD_HARVEST_CONFIG")]
    config: Option<PathBuf>,

    /// Results page URL, overriding the configured one
    #[arg(long, short = 'u')]
    url: Option<String>,

    /// Read the results page from a saved file instead of fetching it
    #[arg(long, short = 'i', conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Archive root, overriding the configured one
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Processing date (YYYY-MM-DD) used when a draw date is unreadable
    #[arg(long, short = 'd')]
    date: Option<NaiveDate>,

    /// Extract and report without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Log level, overriding the configured one
    #[arg(long, short = 'l')]
    log_level: Option<String>,
}

async fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;

    if let Some(url) = &args.url {
        config.source.url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output.data_dir = dir.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args).await?;

    init_logging_with_config(&config.logging)?;
    tracing::info!("fourd-harvest v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(config.registry()?);
    let today = args
        .date
        .unwrap_or_else(|| processing_date(config.output.utc_offset_hours));
    let service = HarvestService::new(registry, &config.parsing, today)
        .context("Invalid parsing configuration")?;

    let source: Arc<dyn DocumentSource> = match &args.input {
        Some(path) => Arc::new(FileDocumentSource::new(path)),
        None => {
            let client = HttpClient::with_config(HttpClientConfig::from_source_config(&config.source))?;
            Arc::new(HttpDocumentSource::new(client, config.source.url.clone()))
        }
    };
    let store = Arc::new(FsArchiveStore::new(&config.output.data_dir));

    let run = HarvestUseCase::new(source, store, service)
        .with_summary(config.output.write_summary)
        .execute(args.dry_run)
        .await?;

    tracing::info!(
        "Run {} wrote {} records ({} missing operators)",
        run.run_id,
        run.written,
        run.outcome.report.missing_operators().len()
    );
    Ok(())
}
