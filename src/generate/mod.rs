//! Task generators: one per content domain (books, education, hadith).
//!
//! A generator drives its source adapters across a set of query terms,
//! de-duplicates within the cycle, normalizes results, applies the
//! acceptance gate, and enqueues canonical drafts. Adapter failures are
//! policy decisions made here: logged and treated as empty results so one
//! flaky provider never aborts a cycle.

mod books;
mod education;
mod hadith;

pub use books::BookGenerator;
pub use education::EducationGenerator;
pub use hadith::HadithGenerator;

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::content::ContentDraft;
use crate::fetch::FetchError;
use crate::normalize::text::sanitize;
use crate::pipeline::{QueueClosed, WorkQueue};

/// Errors that abort a generator's cycle.
///
/// Adapter failures are deliberately absent: they are handled in place.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The work queue closed underneath the generator (shutdown).
    #[error("work queue closed while enqueuing")]
    QueueClosed(#[from] QueueClosed),
}

/// A content-domain task generator, run once per ingestion cycle.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one full pass over this domain's query space, enqueuing
    /// accepted drafts.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::QueueClosed`] when the pipeline is
    /// shutting down.
    async fn run(&self, queue: &WorkQueue) -> Result<(), GeneratorError>;
}

/// Per-cycle de-duplication set.
///
/// Keys combine a source prefix with the provider-native id. The set is
/// discarded at cycle end; cross-cycle duplicates are still filtered by the
/// persistence worker's existence check, which is authoritative.
#[derive(Debug, Default)]
pub struct SeenIds {
    keys: HashSet<String>,
}

impl SeenIds {
    /// Records the id and reports whether this is its first sighting in the
    /// cycle. Empty native ids are not recorded (the acceptance gate
    /// rejects those records downstream).
    pub fn first_sighting(&mut self, prefix: &str, native_id: &str) -> bool {
        if native_id.is_empty() {
            return true;
        }
        self.keys.insert(format!("{prefix}_{native_id}"))
    }

    /// Number of unique ids recorded this cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// How one adapter's result batch is identified, de-duplicated, tagged,
/// and paced on its way into the queue.
struct EnqueueBatch<'a> {
    /// De-duplication key prefix for this source.
    prefix: &'a str,
    /// JSON pointer to the provider-native id within a record.
    id_pointer: &'a str,
    /// The driving query, used in logs.
    query: &'a str,
    /// Tags appended to every accepted draft (the driving query term,
    /// domain labels, level/subject metadata).
    extra_tags: &'a [&'a str],
    /// Politeness pause after each enqueued draft. Zero disables pacing.
    pacing: Duration,
}

/// Shared fan-in path: de-duplicates, normalizes, tags, gates, and
/// enqueues one adapter's result batch.
///
/// An `Err` outcome from the adapter is logged and treated as an empty
/// batch.
async fn enqueue_records(
    queue: &WorkQueue,
    seen: &mut SeenIds,
    batch: &EnqueueBatch<'_>,
    outcome: Result<Vec<Value>, FetchError>,
    normalize: impl Fn(&Value) -> ContentDraft,
) -> Result<(), GeneratorError> {
    let records = match outcome {
        Ok(records) => records,
        Err(fetch_error) => {
            warn!(
                source = batch.prefix,
                query = batch.query,
                %fetch_error,
                "adapter failed; continuing with remaining sources"
            );
            Vec::new()
        }
    };

    for record in &records {
        let native_id = sanitize(record.pointer(batch.id_pointer));
        if !seen.first_sighting(batch.prefix, &native_id) {
            continue;
        }
        let mut draft = normalize(record);
        if !draft.is_acceptable() {
            continue;
        }
        draft
            .tags
            .extend(batch.extra_tags.iter().map(ToString::to_string));
        queue.put(draft).await?;
        if !batch.pacing.is_zero() {
            tokio::time::sleep(batch.pacing).await;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use crate::pipeline::bounded;
    use serde_json::json;

    fn normalize_stub(record: &Value) -> ContentDraft {
        ContentDraft {
            title: sanitize(record.pointer("/title")),
            description: String::new(),
            thumbnail: None,
            source: "Test Source".to_string(),
            source_id: sanitize(record.pointer("/id")),
            source_url: None,
            content_type: ContentType::Book,
            tags: vec![],
            language: "ar".to_string(),
            authors: vec![],
        }
    }

    #[test]
    fn test_seen_ids_dedups_within_prefix() {
        let mut seen = SeenIds::default();
        assert!(seen.first_sighting("google", "a1"));
        assert!(!seen.first_sighting("google", "a1"));
        // Same native id under another source is a different item.
        assert!(seen.first_sighting("openlib", "a1"));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_seen_ids_ignores_empty_ids() {
        let mut seen = SeenIds::default();
        assert!(seen.first_sighting("google", ""));
        assert!(seen.first_sighting("google", ""));
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_adapter_failure_treated_as_empty_batch() {
        let (queue, _receiver) = bounded(8);
        let mut seen = SeenIds::default();
        let outcome = Err(crate::fetch::FetchError::Status {
            url: "http://x".to_string(),
            status: 503,
        });

        enqueue_records(
            &queue,
            &mut seen,
            &EnqueueBatch {
                prefix: "test",
                id_pointer: "/id",
                query: "q",
                extra_tags: &[],
                pacing: Duration::ZERO,
            },
            outcome,
            normalize_stub,
        )
        .await
        .unwrap();

        assert!(queue.is_empty());
        assert!(seen.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spaces_out_enqueued_drafts() {
        let (queue, _receiver) = bounded(8);
        let mut seen = SeenIds::default();
        let records = vec![
            json!({"id": "a", "title": "First"}),
            json!({"id": "b", "title": "Second"}),
        ];

        let start = tokio::time::Instant::now();
        enqueue_records(
            &queue,
            &mut seen,
            &EnqueueBatch {
                prefix: "test",
                id_pointer: "/id",
                query: "q",
                extra_tags: &[],
                pacing: Duration::from_millis(500),
            },
            Ok(records),
            normalize_stub,
        )
        .await
        .unwrap();

        assert_eq!(queue.len(), 2);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
