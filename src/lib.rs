//! Factsweep: a fact-check article crawler
//!
//! This crate crawls a fact-checking site's article listing, follows the
//! statement links it finds, extracts structured claim data from each article
//! page, and upserts the results into a local store keyed by a stable
//! identifier derived from the article URL.

pub mod config;
pub mod crawler;
pub mod record;
pub mod sink;
pub mod storage;

use thiserror::Error;

/// Main error type for Factsweep operations
#[derive(Debug, Error)]
pub enum FactsweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Crawl stage queue closed before the seed was scheduled")]
    StageClosed,

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain in config: {0}")]
    InvalidDomain(String),
}

/// Errors raised while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Result type alias for Factsweep operations
pub type Result<T> = std::result::Result<T, FactsweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlEngine, CrawlSummary};
pub use record::{derive_identifier, Extractor, Record};
pub use storage::{ArticleStore, SqliteStore, UpsertOutcome};
