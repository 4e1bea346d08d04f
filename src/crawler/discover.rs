//! Link discovery on listing pages
//!
//! Listing pages carry one statement teaser per fact-check; the anchor
//! inside each teaser's quote block points at the article page. Discovery
//! resolves those hrefs against the listing URL and reports them in
//! document order, duplicates included. Scope filtering happens in the
//! engine, not here.

use crate::FactsweepError;
use scraper::{Html, Selector};
use url::Url;

const STATEMENT_LINK_SELECTOR: &str = ".m-statement__quote a[href]";

/// Finds article links on a parsed listing page.
pub struct LinkDiscoverer {
    links: Selector,
}

impl LinkDiscoverer {
    pub fn new() -> crate::Result<Self> {
        let links = Selector::parse(STATEMENT_LINK_SELECTOR).map_err(|e| {
            FactsweepError::Selector {
                selector: STATEMENT_LINK_SELECTOR.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { links })
    }

    /// Returns every statement link on the page, resolved against `base`.
    ///
    /// Hrefs that are empty or fail to resolve are skipped with a debug
    /// log; they never fail the listing page.
    pub fn discover_links(&self, document: &Html, base: &Url) -> Vec<Url> {
        let mut links = Vec::new();
        for anchor in document.select(&self.links) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() {
                continue;
            }
            match base.join(href) {
                Ok(url) => links.push(url),
                Err(error) => {
                    tracing::debug!(href, %error, "skipping unresolvable link");
                }
            }
        }
        links
    }
}
