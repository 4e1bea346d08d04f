use serde::Deserialize;

/// Main configuration structure for Factsweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Listing URL the crawl starts from
    #[serde(default = "default_seed")]
    pub seed: String,

    /// Hostnames the crawl may fetch from
    #[serde(rename = "allowed-domains", default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,

    /// Maximum number of fetches in flight across both stages
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Article table name
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_seed() -> String {
    "https://www.politifact.com/factchecks/".to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec!["politifact.com".to_string(), "www.politifact.com".to_string()]
}

fn default_parallelism() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("factsweep/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_database_path() -> String {
    "./factsweep.db".to_string()
}

fn default_table() -> String {
    "articles".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            allowed_domains: default_allowed_domains(),
            parallelism: default_parallelism(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            table: default_table(),
        }
    }
}
