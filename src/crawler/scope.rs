//! Domain allow-list enforcement
//!
//! Discovered links are checked against the configured hostnames before any
//! article fetch is scheduled. Matching is by exact hostname and ignores the
//! port, so a test server on `127.0.0.1:9000` is in scope for `127.0.0.1`.

use url::Url;

/// The set of hostnames the crawl may fetch from.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    allowed: Vec<String>,
}

impl CrawlScope {
    pub fn new(allowed_domains: &[String]) -> Self {
        Self {
            allowed: allowed_domains
                .iter()
                .map(|domain| domain.to_lowercase())
                .collect(),
        }
    }

    /// Returns true when the URL's hostname is on the allow-list.
    ///
    /// URLs without a hostname (`mailto:`, `data:`) are always out of scope.
    pub fn allows(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => {
                let host = host.to_lowercase();
                self.allowed.iter().any(|allowed| *allowed == host)
            }
            None => false,
        }
    }
}
