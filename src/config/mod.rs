//! Configuration module for Factsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use factsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("factsweep.toml")).unwrap();
//! println!("Crawl will start from: {}", config.crawl.seed);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, StoreConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};

// Re-exported so command-line overrides can be revalidated
pub use validation::validate;
