//! Canonical content model shared by the ingestion pipeline and the store.
//!
//! Every external provider's records are normalized into [`ContentDraft`]
//! before they enter the work queue. Persistence assigns the server-side
//! fields (`id`, `added_at`, rating aggregates) and produces a [`Content`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content domains served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Books from catalog providers (Google Books, Open Library, ...).
    Book,
    /// Lessons and curriculum material (videos, reference books).
    Educational,
    /// Hadith recordings and collections.
    Hadith,
}

impl ContentType {
    /// Returns the database string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Educational => "educational",
            Self::Hadith => "hadith",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Self::Book),
            "educational" => Ok(Self::Educational),
            "hadith" => Ok(Self::Hadith),
            _ => Err(format!("invalid content type: {s}")),
        }
    }
}

/// A normalized content record that has not been persisted yet.
///
/// This is the unit moved through the work queue. Drafts are produced by the
/// `normalize` module, gated by [`ContentDraft::is_acceptable`], and turned
/// into [`Content`] rows by the persistence workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    /// Item title. Required for acceptance.
    pub title: String,
    /// Sanitized description, truncated to 500 characters.
    pub description: String,
    /// Cover or preview image URL, when the provider exposes one.
    pub thumbnail: Option<String>,
    /// Human-readable provider name, e.g. "Google Books".
    pub source: String,
    /// Provider-native identifier, unique within `source`. Required for acceptance.
    pub source_id: String,
    /// Canonical link back to the provider.
    pub source_url: Option<String>,
    /// Which catalog domain this record belongs to.
    pub content_type: ContentType,
    /// Provider categories/subjects plus pipeline-added labels.
    pub tags: Vec<String>,
    /// ISO-ish language code; `"ar"` when the provider gives none.
    pub language: String,
    /// Authors, creators, or channel names. May be empty.
    pub authors: Vec<String>,
}

impl ContentDraft {
    /// The acceptance gate: a draft may only be persisted when its title,
    /// source, and source id are all non-empty.
    ///
    /// Applied by generators before enqueuing and again by persistence
    /// workers before inserting.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        !self.title.is_empty() && !self.source.is_empty() && !self.source_id.is_empty()
    }

    /// The cross-cycle de-duplication key.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}::{}", self.source, self.source_id)
    }
}

/// A persisted content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Store-assigned identifier.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub source: String,
    pub source_id: String,
    pub source_url: Option<String>,
    pub content_type: ContentType,
    pub tags: Vec<String>,
    pub language: String,
    pub authors: Vec<String>,
    /// Arithmetic mean of all feedback ratings; 0.0 until feedback exists.
    pub average_rating: f64,
    /// Number of feedback rows backing `average_rating`.
    pub rating_count: i64,
    /// Set by the store at insertion time.
    pub added_at: DateTime<Utc>,
    /// Present iff the record has been soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Content {
    /// Returns true when the record has been soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A feedback submission before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    /// The content row this feedback refers to.
    pub content_id: i64,
    /// Submitting user reference (username).
    pub user: String,
    /// Rating from 1 to 5.
    pub rating: i64,
    /// Free-form comment, 10 to 500 characters.
    pub comment: String,
}

/// A persisted feedback row. Never mutated, never deleted by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub content_id: i64,
    pub user: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// The materialized rating aggregate for one content item.
///
/// Always recomputed from the complete feedback set, never updated
/// incrementally, so rounding errors cannot accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub rating_count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ContentDraft {
        ContentDraft {
            title: "A Brief History".to_string(),
            description: String::new(),
            thumbnail: None,
            source: "Google Books".to_string(),
            source_id: "abc123".to_string(),
            source_url: None,
            content_type: ContentType::Book,
            tags: vec![],
            language: "en".to_string(),
            authors: vec![],
        }
    }

    #[test]
    fn test_content_type_round_trip() {
        for ct in [ContentType::Book, ContentType::Educational, ContentType::Hadith] {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
        assert!("podcast".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_acceptance_gate_requires_title_and_source_id() {
        assert!(draft().is_acceptable());

        let mut missing_title = draft();
        missing_title.title.clear();
        assert!(!missing_title.is_acceptable());

        let mut missing_id = draft();
        missing_id.source_id.clear();
        assert!(!missing_id.is_acceptable());

        let mut missing_source = draft();
        missing_source.source.clear();
        assert!(!missing_source.is_acceptable());
    }

    #[test]
    fn test_dedup_key_combines_source_and_id() {
        assert_eq!(draft().dedup_key(), "Google Books::abc123");
    }
}
