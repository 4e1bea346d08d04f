//! Crawler module for listing traversal and article collection
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching shared by both stages
//! - Link discovery on listing pages
//! - Domain allow-list enforcement
//! - The two-stage engine and its completion handling

mod discover;
mod engine;
mod fetcher;
mod scope;

pub use discover::LinkDiscoverer;
pub use engine::{CrawlEngine, CrawlSummary};
pub use fetcher::{build_http_client, fetch_page};
pub use scope::CrawlScope;

use crate::config::Config;
use crate::sink::spawn_sink;
use crate::storage::ArticleStore;
use tokio::sync::mpsc;

/// Runs a complete crawl against a store.
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the engine from the crawl configuration
/// 2. Spawn the storage sink on its own task
/// 3. Drive the listing and article stages to completion
/// 4. Wait for the sink to drain and merge its report into the summary
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `store` - The article store; it moves onto the sink task
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed and every record was handled
/// * `Err(FactsweepError)` - Setup failed or a stage task panicked
pub async fn crawl<S>(config: &Config, store: S) -> crate::Result<CrawlSummary>
where
    S: ArticleStore + Send + 'static,
{
    let engine = CrawlEngine::new(&config.crawl)?;

    let (records_tx, records_rx) = mpsc::unbounded_channel();
    let sink = spawn_sink(records_rx, store);

    let mut summary = engine.run(records_tx).await?;
    let report = sink.await?;

    summary.inserted = report.inserted;
    summary.updated = report.updated;
    summary.failed_upserts = report.failed;
    Ok(summary)
}
