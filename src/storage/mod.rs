//! Storage module for persisting extracted articles
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Identifier-keyed article upserts
//! - Lookups used by the stats command and tests

mod schema;
mod sqlite;
mod traits;

pub use schema::is_valid_table_name;
pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StoreError, StoreResult, UpsertOutcome};

use crate::config::StoreConfig;
use std::path::Path;

/// Opens the article store described by the configuration
///
/// # Arguments
///
/// * `config` - Database path and table name
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully opened store
/// * `Err(StoreError)` - Invalid table name or SQLite failure
pub fn open_store(config: &StoreConfig) -> StoreResult<SqliteStore> {
    SqliteStore::open(Path::new(&config.database_path), &config.table)
}
