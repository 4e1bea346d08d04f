//! Two-stage crawl engine
//!
//! The engine runs a listing stage and an article stage as independent
//! tasks, each draining an unbounded queue with unlimited task-level
//! concurrency. Actual network pressure is bounded by one semaphore shared
//! across both stages, so at most `parallelism` fetches are in flight for
//! the whole crawl no matter how many pages are queued.

use crate::crawler::discover::LinkDiscoverer;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::scope::CrawlScope;
use crate::record::{Extractor, Record};
use crate::{config::CrawlConfig, FactsweepError};
use futures::StreamExt;
use reqwest::Client;
use scraper::Html;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio_stream::wrappers::UnboundedReceiverStream;
use url::Url;

/// Shared counters updated by both stages while the crawl runs.
#[derive(Debug, Default)]
struct EngineCounters {
    pages_visited: AtomicU64,
    fetch_failures: AtomicU64,
    links_discovered: AtomicU64,
    links_out_of_scope: AtomicU64,
    records_extracted: AtomicU64,
    non_articles: AtomicU64,
}

/// Totals reported once a crawl has fully drained.
///
/// The sink fields (`inserted`, `updated`, `failed_upserts`) are zero in
/// the summary the engine returns; [`crate::crawler::crawl`] fills them in
/// from the sink's report.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub pages_visited: u64,
    pub fetch_failures: u64,
    pub links_discovered: u64,
    pub links_out_of_scope: u64,
    pub records_extracted: u64,
    pub non_articles: u64,
    pub inserted: u64,
    pub updated: u64,
    pub failed_upserts: u64,
    pub elapsed: Duration,
}

/// The crawl pipeline up to, but not including, storage.
///
/// Records flow out through the channel handed to [`CrawlEngine::run`];
/// the engine never touches the store.
pub struct CrawlEngine {
    client: Client,
    seed: Url,
    scope: Arc<CrawlScope>,
    discoverer: Arc<LinkDiscoverer>,
    extractor: Arc<Extractor>,
    fetch_permits: Arc<Semaphore>,
}

impl CrawlEngine {
    /// Builds an engine from a validated crawl configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Seed URL, allow-list, parallelism, and HTTP settings
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to run
    /// * `Err(FactsweepError)` - Unparseable seed or HTTP client failure
    pub fn new(config: &CrawlConfig) -> crate::Result<Self> {
        let seed = Url::parse(&config.seed)?;
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            seed,
            scope: Arc::new(CrawlScope::new(&config.allowed_domains)),
            discoverer: Arc::new(LinkDiscoverer::new()?),
            extractor: Arc::new(Extractor::new()?),
            fetch_permits: Arc::new(Semaphore::new(config.parallelism)),
        })
    }

    /// Runs the crawl to completion and returns the stage totals.
    ///
    /// Termination rides on sender drops rather than explicit signals. The
    /// seed sender is dropped as soon as the seed is queued, so the listing
    /// queue closes once its pages are drained. The article queue's only
    /// sender lives inside the listing driver and dies with it, and
    /// `records_tx` is owned by the article driver, so the record channel
    /// closes exactly when the last article page has been handled. Awaiting
    /// the listing driver and then the article driver observes that order.
    pub async fn run(
        &self,
        records_tx: mpsc::UnboundedSender<Record>,
    ) -> crate::Result<CrawlSummary> {
        let started = Instant::now();
        let counters = Arc::new(EngineCounters::default());

        let (listing_tx, listing_rx) = mpsc::unbounded_channel::<Url>();
        let (article_tx, article_rx) = mpsc::unbounded_channel::<Url>();

        let article_driver = tokio::spawn(drive_article_stage(
            article_rx,
            records_tx,
            self.client.clone(),
            Arc::clone(&self.extractor),
            Arc::clone(&self.fetch_permits),
            Arc::clone(&counters),
        ));
        let listing_driver = tokio::spawn(drive_listing_stage(
            listing_rx,
            article_tx,
            self.client.clone(),
            Arc::clone(&self.discoverer),
            Arc::clone(&self.scope),
            Arc::clone(&self.fetch_permits),
            Arc::clone(&counters),
        ));

        listing_tx
            .send(self.seed.clone())
            .map_err(|_| FactsweepError::StageClosed)?;
        drop(listing_tx);

        listing_driver.await?;
        article_driver.await?;

        Ok(CrawlSummary {
            pages_visited: counters.pages_visited.load(Ordering::SeqCst),
            fetch_failures: counters.fetch_failures.load(Ordering::SeqCst),
            links_discovered: counters.links_discovered.load(Ordering::SeqCst),
            links_out_of_scope: counters.links_out_of_scope.load(Ordering::SeqCst),
            records_extracted: counters.records_extracted.load(Ordering::SeqCst),
            non_articles: counters.non_articles.load(Ordering::SeqCst),
            inserted: 0,
            updated: 0,
            failed_upserts: 0,
            elapsed: started.elapsed(),
        })
    }
}

async fn drive_listing_stage(
    queue: mpsc::UnboundedReceiver<Url>,
    article_tx: mpsc::UnboundedSender<Url>,
    client: Client,
    discoverer: Arc<LinkDiscoverer>,
    scope: Arc<CrawlScope>,
    permits: Arc<Semaphore>,
    counters: Arc<EngineCounters>,
) {
    UnboundedReceiverStream::new(queue)
        .for_each_concurrent(None, |url| {
            let article_tx = article_tx.clone();
            let client = client.clone();
            let discoverer = Arc::clone(&discoverer);
            let scope = Arc::clone(&scope);
            let permits = Arc::clone(&permits);
            let counters = Arc::clone(&counters);
            async move {
                visit_listing_page(url, article_tx, client, discoverer, scope, permits, counters)
                    .await;
            }
        })
        .await;
}

async fn visit_listing_page(
    url: Url,
    article_tx: mpsc::UnboundedSender<Url>,
    client: Client,
    discoverer: Arc<LinkDiscoverer>,
    scope: Arc<CrawlScope>,
    permits: Arc<Semaphore>,
    counters: Arc<EngineCounters>,
) {
    tracing::info!(url = %url, "visiting listing page");

    // The permit covers the fetch only; parsing runs unbounded.
    let body = {
        let _permit = match permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return,
        };
        match fetch_page(&client, &url).await {
            Ok(body) => body,
            Err(error) => {
                counters.fetch_failures.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(url = %url, %error, "listing fetch failed");
                return;
            }
        }
    };
    counters.pages_visited.fetch_add(1, Ordering::SeqCst);

    // Html is not Send, so parsing stays after the last await point.
    let document = Html::parse_document(&body);
    for link in discoverer.discover_links(&document, &url) {
        counters.links_discovered.fetch_add(1, Ordering::SeqCst);
        if scope.allows(&link) {
            tracing::info!(url = %link, "article found");
            if article_tx.send(link).is_err() {
                tracing::error!("article queue closed while listing pages remain");
                return;
            }
        } else {
            counters.links_out_of_scope.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(url = %link, "link outside allowed domains");
        }
    }
}

async fn drive_article_stage(
    queue: mpsc::UnboundedReceiver<Url>,
    records_tx: mpsc::UnboundedSender<Record>,
    client: Client,
    extractor: Arc<Extractor>,
    permits: Arc<Semaphore>,
    counters: Arc<EngineCounters>,
) {
    UnboundedReceiverStream::new(queue)
        .for_each_concurrent(None, |url| {
            let records_tx = records_tx.clone();
            let client = client.clone();
            let extractor = Arc::clone(&extractor);
            let permits = Arc::clone(&permits);
            let counters = Arc::clone(&counters);
            async move {
                visit_article_page(url, records_tx, client, extractor, permits, counters).await;
            }
        })
        .await;
}

async fn visit_article_page(
    url: Url,
    records_tx: mpsc::UnboundedSender<Record>,
    client: Client,
    extractor: Arc<Extractor>,
    permits: Arc<Semaphore>,
    counters: Arc<EngineCounters>,
) {
    let body = {
        let _permit = match permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return,
        };
        match fetch_page(&client, &url).await {
            Ok(body) => body,
            Err(error) => {
                counters.fetch_failures.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(url = %url, %error, "article fetch failed");
                return;
            }
        }
    };
    counters.pages_visited.fetch_add(1, Ordering::SeqCst);

    let document = Html::parse_document(&body);
    match extractor.extract_article(&document, url.as_str()) {
        Some(record) => {
            counters.records_extracted.fetch_add(1, Ordering::SeqCst);
            if records_tx.send(record).is_err() {
                tracing::error!("record channel closed while article pages remain");
            }
        }
        None => {
            counters.non_articles.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(url = %url, "no article content found");
        }
    }
}
