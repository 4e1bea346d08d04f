//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore
//! trait. List-valued fields (tags, sources) are stored as JSON text;
//! everything else maps to plain TEXT columns keyed by the identifier.

use crate::record::Record;
use crate::storage::schema::{initialize_schema, is_valid_table_name};
use crate::storage::traits::{ArticleStore, StoreError, StoreResult, UpsertOutcome};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite article store
pub struct SqliteStore {
    conn: Connection,
    table: String,
}

impl SqliteStore {
    /// Opens or creates the database file and its article table.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `table` - Article table name; must be a plain SQL identifier
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened database
    /// * `Err(StoreError)` - Invalid table name or SQLite failure
    pub fn open(path: &Path, table: &str) -> StoreResult<Self> {
        if !is_valid_table_name(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn, table)?;

        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Creates an in-memory store, used by dry runs and tests.
    pub fn open_in_memory(table: &str) -> StoreResult<Self> {
        if !is_valid_table_name(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn, table)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// The table this store writes to.
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Raw row fetched before the JSON columns are decoded.
struct ArticleRow {
    identifier: String,
    url: String,
    title: String,
    author: String,
    published_date: String,
    claim: String,
    claim_date: String,
    rating: String,
    tags: String,
    sources: String,
}

impl ArticleRow {
    fn into_record(self) -> StoreResult<Record> {
        Ok(Record {
            identifier: self.identifier,
            url: self.url,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            claim: self.claim,
            claim_date: self.claim_date,
            rating: self.rating,
            tags: serde_json::from_str(&self.tags)?,
            sources: serde_json::from_str(&self.sources)?,
        })
    }
}

impl ArticleStore for SqliteStore {
    fn upsert_article(&mut self, record: &Record) -> StoreResult<UpsertOutcome> {
        let tags = serde_json::to_string(&record.tags)?;
        let sources = serde_json::to_string(&record.sources)?;
        let now = Utc::now().to_rfc3339();

        // Check for an existing row first so the outcome can be reported
        let existing: Option<String> = self
            .conn
            .query_row(
                &format!(
                    "SELECT identifier FROM {} WHERE identifier = ?1",
                    self.table
                ),
                params![record.identifier],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            self.conn.execute(
                &format!(
                    "UPDATE {} SET url = ?2, title = ?3, author = ?4, published_date = ?5,
                     claim = ?6, claim_date = ?7, rating = ?8, tags = ?9, sources = ?10,
                     last_updated_at = ?11
                     WHERE identifier = ?1",
                    self.table
                ),
                params![
                    record.identifier,
                    record.url,
                    record.title,
                    record.author,
                    record.published_date,
                    record.claim,
                    record.claim_date,
                    record.rating,
                    tags,
                    sources,
                    now
                ],
            )?;
            Ok(UpsertOutcome::Updated)
        } else {
            self.conn.execute(
                &format!(
                    "INSERT INTO {} (identifier, url, title, author, published_date, claim,
                     claim_date, rating, tags, sources, first_seen_at, last_updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                    self.table
                ),
                params![
                    record.identifier,
                    record.url,
                    record.title,
                    record.author,
                    record.published_date,
                    record.claim,
                    record.claim_date,
                    record.rating,
                    tags,
                    sources,
                    now
                ],
            )?;
            Ok(UpsertOutcome::Inserted)
        }
    }

    fn get_article(&self, identifier: &str) -> StoreResult<Option<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT identifier, url, title, author, published_date, claim, claim_date,
             rating, tags, sources
             FROM {} WHERE identifier = ?1",
            self.table
        ))?;

        let row = stmt
            .query_row(params![identifier], |row| {
                Ok(ArticleRow {
                    identifier: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get(2)?,
                    author: row.get(3)?,
                    published_date: row.get(4)?,
                    claim: row.get(5)?,
                    claim_date: row.get(6)?,
                    rating: row.get(7)?,
                    tags: row.get(8)?,
                    sources: row.get(9)?,
                })
            })
            .optional()?;

        match row {
            Some(row) => Ok(Some(row.into_record()?)),
            None => Ok(None),
        }
    }

    fn article_count(&self) -> StoreResult<u64> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}
