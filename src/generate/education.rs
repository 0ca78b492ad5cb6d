//! Education task generator: static curriculum seeds plus lesson videos.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::content::{ContentDraft, ContentType};
use crate::fetch::YouTube;
use crate::normalize::media;
use crate::pipeline::WorkQueue;

use super::{EnqueueBatch, GeneratorError, SeenIds, TaskGenerator, enqueue_records};

/// Statically-defined curriculum reference books, seeded into the queue
/// before the network phase. Fields: title, description, path, level,
/// subject.
const STATIC_CURRICULUM: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Arabic Language Textbook - Primary",
        "Arabic language fundamentals for the primary level.",
        "/books/arabic_primary",
        "primary",
        "Arabic",
    ),
    (
        "Physics Textbook - Middle School",
        "Principles of physics for the middle level.",
        "/books/physics_middle",
        "middle school",
        "physics",
    ),
    (
        "Mathematics Textbook - Middle School",
        "Algebra and geometry foundations for the middle level.",
        "/books/math_middle",
        "middle school",
        "mathematics",
    ),
    (
        "Chemistry Textbook - High School",
        "Advanced chemistry concepts for the secondary level.",
        "/books/chemistry_high",
        "high school",
        "chemistry",
    ),
    (
        "Philosophy Textbook - High School",
        "An introduction to classical and modern philosophy.",
        "/books/philosophy_high",
        "high school",
        "philosophy",
    ),
    (
        "Statistics Textbook - University",
        "An introduction to statistics and data analysis.",
        "/books/stats_university",
        "university",
        "statistics",
    ),
    (
        "Psychology Textbook - University",
        "Theories of personality, behavior, and learning.",
        "/books/psychology_university",
        "university",
        "psychology",
    ),
];

/// Subjects crossed with levels and query phrasings for the video search.
const SUBJECTS: &[&str] = &[
    "mathematics",
    "physics",
    "chemistry",
    "biology",
    "Arabic",
    "French",
    "English",
    "philosophy",
    "history",
    "geography",
    "programming",
    "psychology",
    "economics",
    "politics",
];

/// Education levels.
const LEVELS: &[&str] = &["primary", "middle school", "high school", "university"];

/// Query phrasings, one video search per (phrasing, subject, level).
const QUERY_TYPES: &[&str] = &["lesson explanation", "exercises and solutions", "full review"];

/// Videos requested per query.
const VIDEO_MAX_RESULTS: u32 = 5;

/// Politeness delay after each enqueued video.
const VIDEO_DELAY: Duration = Duration::from_millis(500);

/// Generates educational content: a fixed curriculum seed followed by a
/// cross-product of lesson-video searches against YouTube.
pub struct EducationGenerator {
    youtube: YouTube,
    subjects: Vec<String>,
    levels: Vec<String>,
    query_types: Vec<String>,
    video_delay: Duration,
    max_results: u32,
}

impl EducationGenerator {
    /// Creates a generator with the default subject/level/phrasing lists.
    #[must_use]
    pub fn new(youtube: YouTube) -> Self {
        Self {
            youtube,
            subjects: SUBJECTS.iter().map(ToString::to_string).collect(),
            levels: LEVELS.iter().map(ToString::to_string).collect(),
            query_types: QUERY_TYPES.iter().map(ToString::to_string).collect(),
            video_delay: VIDEO_DELAY,
            max_results: VIDEO_MAX_RESULTS,
        }
    }

    /// Replaces the query cross-product dimensions (narrowed in tests).
    #[must_use]
    pub fn with_query_space(
        mut self,
        subjects: Vec<String>,
        levels: Vec<String>,
        query_types: Vec<String>,
    ) -> Self {
        self.subjects = subjects;
        self.levels = levels;
        self.query_types = query_types;
        self
    }

    /// Overrides the politeness delay after each enqueued video.
    #[must_use]
    pub fn with_video_delay(mut self, delay: Duration) -> Self {
        self.video_delay = delay;
        self
    }

    /// Seeds the statically-defined curriculum books into the queue.
    async fn seed_static_books(&self, queue: &WorkQueue) -> Result<(), GeneratorError> {
        for (title, description, path, level, subject) in STATIC_CURRICULUM {
            let draft = ContentDraft {
                title: (*title).to_string(),
                description: (*description).to_string(),
                thumbnail: None,
                source: "Digital Library".to_string(),
                source_id: (*path).to_string(),
                source_url: Some((*path).to_string()),
                content_type: ContentType::Educational,
                tags: vec![
                    "curriculum".to_string(),
                    (*level).to_string(),
                    (*subject).to_string(),
                ],
                language: "ar".to_string(),
                authors: vec![],
            };
            queue.put(draft).await?;
        }
        info!(count = STATIC_CURRICULUM.len(), "seeded static curriculum books");
        Ok(())
    }
}

#[async_trait]
impl TaskGenerator for EducationGenerator {
    fn name(&self) -> &'static str {
        "education"
    }

    async fn run(&self, queue: &WorkQueue) -> Result<(), GeneratorError> {
        self.seed_static_books(queue).await?;

        let query_count = self.levels.len() * self.subjects.len() * self.query_types.len();
        info!(queries = query_count, "education generator starting video phase");

        let mut seen = SeenIds::default();
        for level in &self.levels {
            for subject in &self.subjects {
                for query_type in &self.query_types {
                    let query = format!("{query_type} {subject} {level}");
                    let outcome = self.youtube.search(&query, self.max_results).await;
                    enqueue_records(
                        queue,
                        &mut seen,
                        &EnqueueBatch {
                            prefix: "youtube",
                            id_pointer: "/id/videoId",
                            query: &query,
                            extra_tags: &["educational video", level, subject, query_type],
                            pacing: self.video_delay,
                        },
                        outcome,
                        |record| media::youtube_video(record, ContentType::Educational),
                    )
                    .await?;
                }
            }
        }

        info!(unique = seen.len(), "education generator cycle finished");
        Ok(())
    }
}
