//! Persistence workers: dequeue canonical drafts and write them to the store.
//!
//! Each worker loops forever: dequeue, check existence by the
//! (source, source_id) de-duplication key, insert iff absent and valid.
//! Existence check and insert are not one atomic transaction; under
//! concurrent identical fetches a duplicate can slip through, which is
//! accepted because re-ingestion is idempotent at the next cycle.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::content::ContentDraft;
use crate::store::ContentStore;

use super::queue::WorkReceiver;

/// Runs one persistence worker until shutdown or queue closure.
///
/// Store errors are logged and the worker moves on to the next item;
/// nothing here is fatal to the process.
pub async fn persistence_worker(
    name: String,
    receiver: WorkReceiver,
    store: Arc<dyn ContentStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(worker = %name, "persistence worker started");
    loop {
        let draft = tokio::select! {
            _ = shutdown.changed() => {
                info!(worker = %name, "shutdown signal received");
                break;
            }
            next = receiver.get() => match next {
                Ok(draft) => draft,
                Err(_) => {
                    debug!(worker = %name, "work queue closed; exiting");
                    break;
                }
            },
        };
        persist_draft(&name, store.as_ref(), draft).await;
    }
}

async fn persist_draft(name: &str, store: &dyn ContentStore, draft: ContentDraft) {
    debug!(worker = %name, title = %draft.title, "processing draft");

    match store.find_by_source(&draft.source, &draft.source_id).await {
        Ok(Some(existing)) => {
            debug!(
                worker = %name,
                id = existing.id,
                key = %draft.dedup_key(),
                "skipped duplicate content"
            );
        }
        Ok(None) => {
            // Defense in depth: a malformed draft must never be persisted
            // even if it slipped past the generator-side gate.
            if !draft.is_acceptable() {
                warn!(worker = %name, key = %draft.dedup_key(), "skipped invalid draft");
                return;
            }
            match store.insert(&draft).await {
                Ok(content) => {
                    info!(worker = %name, id = content.id, title = %content.title, "saved new content");
                }
                Err(store_error) => {
                    error!(worker = %name, key = %draft.dedup_key(), %store_error, "insert failed");
                }
            }
        }
        Err(store_error) => {
            error!(worker = %name, key = %draft.dedup_key(), %store_error, "existence check failed");
        }
    }
}
