//! Database schema definitions
//!
//! The article table name is configurable, so the schema is rendered per
//! table instead of being one static script. Table names are validated
//! before use because they are spliced into SQL directly.

/// Returns true for table names safe to splice into SQL.
///
/// Valid names start with an ASCII letter or underscore and contain only
/// ASCII letters, digits, and underscores.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Renders the SQL schema for one article table
pub fn schema_sql(table: &str) -> String {
    format!(
        r#"
-- Extracted fact-check articles, one row per identifier
CREATE TABLE IF NOT EXISTS {table} (
    identifier TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    published_date TEXT NOT NULL,
    claim TEXT NOT NULL,
    claim_date TEXT NOT NULL,
    rating TEXT NOT NULL,
    tags TEXT NOT NULL,
    sources TEXT NOT NULL,
    first_seen_at TEXT NOT NULL,
    last_updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_{table}_rating ON {table}(rating);
"#
    )
}

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `table` - The validated article table name
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection, table: &str) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&schema_sql(table))?;
    Ok(())
}
