//! Hadith task generator: audio recordings from the Internet Archive.

use async_trait::async_trait;
use tracing::info;

use crate::content::ContentType;
use crate::fetch::ArchiveOrg;
use crate::normalize::media;
use crate::pipeline::WorkQueue;

use std::time::Duration;

use super::{EnqueueBatch, GeneratorError, SeenIds, TaskGenerator, enqueue_records};

/// Hadith collection search terms.
const QUERY_TERMS: &[&str] = &[
    "Sahih al-Bukhari",
    "Sahih Muslim",
    "Riyad as-Salihin commentary",
    "Sunan al-Tirmidhi",
    "Forty Hadith of Nawawi",
    "Musnad Ahmad",
    "al-Targhib wa al-Tarhib",
    "hadith methodology",
];

/// Audio recordings tend to have many parts; fetch a few extra per query.
const AUDIO_MAX_RESULTS: u32 = 15;

/// Generates hadith ingestion tasks: a fixed query list against the
/// Internet Archive restricted to audio items, every result tagged with the
/// domain label.
pub struct HadithGenerator {
    archive: ArchiveOrg,
    queries: Vec<String>,
    max_results: u32,
}

impl HadithGenerator {
    /// Creates a generator with the default collection list.
    #[must_use]
    pub fn new(archive: ArchiveOrg) -> Self {
        Self {
            archive,
            queries: QUERY_TERMS.iter().map(ToString::to_string).collect(),
            max_results: AUDIO_MAX_RESULTS,
        }
    }

    /// Replaces the query list (narrowed in tests).
    #[must_use]
    pub fn with_queries(mut self, queries: Vec<String>) -> Self {
        self.queries = queries;
        self
    }
}

#[async_trait]
impl TaskGenerator for HadithGenerator {
    fn name(&self) -> &'static str {
        "hadith"
    }

    async fn run(&self, queue: &WorkQueue) -> Result<(), GeneratorError> {
        info!(queries = self.queries.len(), "hadith generator starting cycle");
        let mut seen = SeenIds::default();

        for term in &self.queries {
            let outcome = self.archive.search(term, "audio", self.max_results).await;
            enqueue_records(
                queue,
                &mut seen,
                &EnqueueBatch {
                    prefix: "archive",
                    id_pointer: "/identifier",
                    query: term,
                    extra_tags: &["hadith"],
                    pacing: Duration::ZERO,
                },
                outcome,
                |record| media::archive_item(record, ContentType::Hadith),
            )
            .await?;
        }

        info!(unique = seen.len(), "hadith generator cycle finished");
        Ok(())
    }
}
