//! The document-store contract consumed by the pipeline and services.
//!
//! The pipeline only ever talks to [`ContentStore`], a narrow async trait:
//! existence check by de-duplication key, insert, lookup, listing, rating
//! update, soft delete, and the feedback aggregation query. [`SqliteStore`]
//! is the bundled backend.

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::{Content, ContentDraft, ContentType, Feedback, NewFeedback, RatingSummary};

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row could not be decoded into the content model.
    #[error("corrupt content row: {0}")]
    Corrupt(String),

    /// The referenced content row does not exist.
    #[error("content {0} not found")]
    NotFound(i64),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Listing parameters for the query boundary.
///
/// Pages are 1-based. Soft-deleted rows are always excluded.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    /// Which content domain to list.
    pub content_type: ContentType,
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Optional text search over title and description.
    pub query: Option<String>,
    /// Tags that must all be present.
    pub tags: Vec<String>,
}

impl ContentFilter {
    /// A filter listing the first page of a content type.
    #[must_use]
    pub fn by_type(content_type: ContentType) -> Self {
        Self {
            content_type,
            page: 1,
            page_size: 20,
            query: None,
            tags: Vec::new(),
        }
    }
}

/// The keyed-document store contract.
///
/// Implementations must be safe for concurrent use by multiple persistence
/// workers; the check-then-insert race in callers is documented and
/// accepted.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Looks up a record by its (source, source_id) de-duplication key.
    /// Soft-deleted rows are included so deleted content is not re-ingested.
    async fn find_by_source(&self, source: &str, source_id: &str) -> Result<Option<Content>>;

    /// Inserts a draft, assigning the id and `added_at` timestamp.
    async fn insert(&self, draft: &ContentDraft) -> Result<Content>;

    /// Looks up a record by id, including soft-deleted rows.
    async fn find(&self, id: i64) -> Result<Option<Content>>;

    /// Lists non-deleted records matching the filter, newest first.
    async fn list(&self, filter: &ContentFilter) -> Result<Vec<Content>>;

    /// Writes a recomputed rating aggregate onto a content row.
    async fn update_rating(&self, id: i64, summary: &RatingSummary) -> Result<()>;

    /// Marks a record deleted by setting `deleted_at`. The row is retained.
    async fn soft_delete(&self, id: i64) -> Result<()>;

    /// Persists a feedback row, assigning id and `created_at`.
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback>;

    /// Aggregates the complete feedback set for one content id.
    /// Zero rows yield an average of 0.0 and a count of 0.
    async fn aggregate_feedback(&self, content_id: i64) -> Result<RatingSummary>;
}
