//! Book task generator: fans out across all book catalog providers.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::content::ContentType;
use crate::fetch::{
    ArchiveOrg, DEFAULT_MAX_RESULTS, GoogleBooks, LibraryOfCongress, OpenLibrary, WorldCat,
};
use crate::normalize::{books, media};
use crate::pipeline::WorkQueue;

use super::{EnqueueBatch, GeneratorError, SeenIds, TaskGenerator, enqueue_records};

/// Default query terms driving the book search.
const QUERY_TERMS: &[&str] = &[
    "history",
    "science",
    "literature",
    "philosophy",
    "programming",
    "novels",
    "Quran",
    "Hadith",
    "Fiqh",
    "Seerah",
    "psychology",
    "economics",
    "politics",
];

/// Languages searched for every query term.
const LANGUAGES: &[&str] = &["ar", "en", "fr", "es", "de"];

/// Politeness delay between (term, language) pairs.
const PAIR_DELAY: Duration = Duration::from_secs(1);

/// Generates book ingestion tasks from five catalog providers.
///
/// For each (query term, language) pair all adapters are queried
/// concurrently; a slow or failing provider never blocks the others.
pub struct BookGenerator {
    google: GoogleBooks,
    open_library: OpenLibrary,
    worldcat: WorldCat,
    loc: LibraryOfCongress,
    archive: ArchiveOrg,
    queries: Vec<String>,
    languages: Vec<String>,
    pair_delay: Duration,
    max_results: u32,
}

impl BookGenerator {
    /// Creates a generator with the default query-term and language lists.
    #[must_use]
    pub fn new(
        google: GoogleBooks,
        open_library: OpenLibrary,
        worldcat: WorldCat,
        loc: LibraryOfCongress,
        archive: ArchiveOrg,
    ) -> Self {
        Self {
            google,
            open_library,
            worldcat,
            loc,
            archive,
            queries: QUERY_TERMS.iter().map(ToString::to_string).collect(),
            languages: LANGUAGES.iter().map(ToString::to_string).collect(),
            pair_delay: PAIR_DELAY,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Replaces the query-term and language lists (narrowed in tests).
    #[must_use]
    pub fn with_query_space(mut self, queries: Vec<String>, languages: Vec<String>) -> Self {
        self.queries = queries;
        self.languages = languages;
        self
    }

    /// Overrides the politeness delay between (term, language) pairs.
    #[must_use]
    pub fn with_pair_delay(mut self, delay: Duration) -> Self {
        self.pair_delay = delay;
        self
    }
}

#[async_trait]
impl TaskGenerator for BookGenerator {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn run(&self, queue: &WorkQueue) -> Result<(), GeneratorError> {
        info!(
            queries = self.queries.len(),
            languages = self.languages.len(),
            "book generator starting cycle"
        );
        let mut seen = SeenIds::default();

        for term in &self.queries {
            for lang in &self.languages {
                // Fan-out: all five providers at once, fan-in on join.
                let (google, open_library, worldcat, loc, archive) = tokio::join!(
                    self.google.search(term, lang, self.max_results),
                    self.open_library.search(term, lang, self.max_results),
                    self.worldcat.search(term, self.max_results),
                    self.loc.search(term, self.max_results),
                    self.archive.search(term, "texts", self.max_results),
                );

                let term_tags = [term.as_str()];
                enqueue_records(
                    queue,
                    &mut seen,
                    &EnqueueBatch {
                        prefix: "google",
                        id_pointer: "/id",
                        query: term,
                        extra_tags: &term_tags,
                        pacing: Duration::ZERO,
                    },
                    google,
                    books::google_book,
                )
                .await?;
                enqueue_records(
                    queue,
                    &mut seen,
                    &EnqueueBatch {
                        prefix: "openlib",
                        id_pointer: "/key",
                        query: term,
                        extra_tags: &term_tags,
                        pacing: Duration::ZERO,
                    },
                    open_library,
                    books::open_library_book,
                )
                .await?;
                enqueue_records(
                    queue,
                    &mut seen,
                    &EnqueueBatch {
                        prefix: "worldcat",
                        id_pointer: "/id",
                        query: term,
                        extra_tags: &term_tags,
                        pacing: Duration::ZERO,
                    },
                    worldcat,
                    books::worldcat_book,
                )
                .await?;
                enqueue_records(
                    queue,
                    &mut seen,
                    &EnqueueBatch {
                        prefix: "loc",
                        id_pointer: "/id",
                        query: term,
                        extra_tags: &term_tags,
                        pacing: Duration::ZERO,
                    },
                    loc,
                    books::loc_book,
                )
                .await?;
                enqueue_records(
                    queue,
                    &mut seen,
                    &EnqueueBatch {
                        prefix: "archive",
                        id_pointer: "/identifier",
                        query: term,
                        extra_tags: &term_tags,
                        pacing: Duration::ZERO,
                    },
                    archive,
                    |record| media::archive_item(record, ContentType::Book),
                )
                .await?;

                tokio::time::sleep(self.pair_delay).await;
            }
        }

        info!(unique = seen.len(), "book generator cycle finished");
        Ok(())
    }
}
