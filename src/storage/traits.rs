//! Storage trait and error types
//!
//! This module defines the trait interface for article storage backends
//! and associated error types.

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Whether an upsert created a new row or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Trait for article storage backends
///
/// The sink owns exactly one implementation per crawl, so methods take
/// `&mut self` and implementations need no internal locking.
pub trait ArticleStore {
    /// Inserts the record, or replaces the stored copy with the same
    /// identifier.
    ///
    /// # Arguments
    ///
    /// * `record` - The extracted article record
    ///
    /// # Returns
    ///
    /// Whether the record was inserted or updated
    fn upsert_article(&mut self, record: &Record) -> StoreResult<UpsertOutcome>;

    /// Looks up a stored record by identifier.
    fn get_article(&self, identifier: &str) -> StoreResult<Option<Record>>;

    /// Counts the stored records.
    fn article_count(&self) -> StoreResult<u64>;
}
