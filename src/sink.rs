//! Single-writer storage sink
//!
//! Every record the article stage extracts funnels through one channel into
//! one task that owns the store, so upserts are serialized without locking.
//! The sink drains until the channel closes, which happens exactly when the
//! article stage has finished, and then reports what it wrote.

use crate::record::Record;
use crate::storage::{ArticleStore, UpsertOutcome};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// What the sink did with the records it received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub inserted: u64,
    pub updated: u64,
    pub failed: u64,
}

/// Spawns the sink task; the store moves onto it.
///
/// The returned handle resolves once the record channel has closed and
/// every received record has been written or counted as failed.
pub fn spawn_sink<S>(records: UnboundedReceiver<Record>, store: S) -> JoinHandle<SinkReport>
where
    S: ArticleStore + Send + 'static,
{
    tokio::spawn(drain_records(records, store))
}

async fn drain_records<S: ArticleStore>(
    mut records: UnboundedReceiver<Record>,
    mut store: S,
) -> SinkReport {
    let mut report = SinkReport::default();

    while let Some(record) = records.recv().await {
        if record.identifier.is_empty() {
            tracing::warn!(url = %record.url, "record has an empty identifier");
        }
        match store.upsert_article(&record) {
            Ok(UpsertOutcome::Inserted) => {
                report.inserted += 1;
                tracing::info!(identifier = %record.identifier, "new article");
            }
            Ok(UpsertOutcome::Updated) => {
                report.updated += 1;
                tracing::info!(identifier = %record.identifier, "updated article");
            }
            Err(error) => {
                report.failed += 1;
                tracing::error!(identifier = %record.identifier, %error, "upsert failed");
            }
        }
    }

    report
}
