//! Factsweep main entry point
//!
//! This is the command-line interface for the Factsweep fact-check crawler.

use anyhow::Context;
use clap::Parser;
use factsweep::config::{load_config_or_default, validate, Config};
use factsweep::crawler::{crawl, CrawlSummary};
use factsweep::storage::{open_store, ArticleStore, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Factsweep: a fact-check article crawler
///
/// Factsweep walks a fact-checking site's listing page, follows every
/// statement link it finds, extracts the claim, verdict, and sourcing
/// from each article page, and upserts the results into SQLite.
#[derive(Parser, Debug)]
#[command(name = "factsweep")]
#[command(version)]
#[command(about = "A fact-check article crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "factsweep.toml")]
    config: PathBuf,

    /// Override the listing URL the crawl starts from
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Override the SQLite database path
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Override the article table name
    #[arg(long, value_name = "TABLE")]
    table: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the full crawl against an in-memory database and discard it
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    // Command-line overrides take precedence over the file
    if let Some(seed) = cli.seed {
        config.crawl.seed = seed;
    }
    if let Some(database) = cli.database {
        config.store.database_path = database;
    }
    if let Some(table) = cli.table {
        config.store.table = table;
    }
    validate(&config).context("invalid configuration")?;

    if cli.stats {
        handle_stats(&config)?;
    } else if cli.dry_run {
        handle_dry_run(&config).await?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("factsweep=info,warn"),
            1 => EnvFilter::new("factsweep=debug,info"),
            2 => EnvFilter::new("factsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: shows what the database holds
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.store)
        .with_context(|| format!("failed to open {}", config.store.database_path))?;

    println!("Database: {}", config.store.database_path);
    println!("Table: {}", store.table());
    println!("Articles: {}", store.article_count()?);

    Ok(())
}

/// Handles the --dry-run mode: full crawl, nothing written to disk
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Dry run: results will be discarded");

    let store = SqliteStore::open_in_memory(&config.store.table)?;
    let summary = crawl(config, store).await?;
    report_summary(&summary);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let store = open_store(&config.store)
        .with_context(|| format!("failed to open {}", config.store.database_path))?;

    tracing::info!(
        "Starting crawl from {} into {} ({})",
        config.crawl.seed,
        config.store.database_path,
        config.store.table
    );

    let summary = crawl(config, store).await?;
    report_summary(&summary);

    Ok(())
}

/// Logs the final crawl totals
fn report_summary(summary: &CrawlSummary) {
    tracing::info!(
        "Crawl finished: {} pages visited, {} fetch failures, {} records extracted",
        summary.pages_visited,
        summary.fetch_failures,
        summary.records_extracted
    );
    tracing::info!(
        "Stored {} new and {} updated articles ({} failed) in {:.1}s",
        summary.inserted,
        summary.updated,
        summary.failed_upserts,
        summary.elapsed.as_secs_f64()
    );
}
