//! Content service: the query boundary and the feedback aggregator.
//!
//! Listing and lookup respect soft deletion; feedback submission validates
//! the input, persists the row, and recomputes the parent's rating
//! aggregate from the complete feedback set. The aggregate is never
//! updated incrementally, so repeated submissions cannot accumulate drift.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::content::{Content, ContentType, Feedback, NewFeedback};
use crate::store::{ContentFilter, ContentStore, StoreError};

/// Minimum feedback comment length.
const COMMENT_MIN: usize = 10;

/// Maximum feedback comment length.
const COMMENT_MAX: usize = 500;

/// Service-level errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The content row is absent or soft-deleted.
    #[error("content {0} not found")]
    NotFound(i64),

    /// Rating outside the 1-5 range.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    /// Comment length outside the allowed range.
    #[error("comment must be {COMMENT_MIN} to {COMMENT_MAX} characters, got {0}")]
    InvalidComment(usize),

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// High-level content operations over a [`ContentStore`].
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    /// Creates a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Lists content of one type with optional text search and tag
    /// filtering. Pages are 1-based; soft-deleted rows are excluded.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] on store failure.
    pub async fn list_by_type(
        &self,
        content_type: ContentType,
        page: u32,
        page_size: u32,
        query: Option<String>,
        tags: Vec<String>,
    ) -> Result<Vec<Content>> {
        let filter = ContentFilter {
            content_type,
            page,
            page_size,
            query,
            tags,
        };
        Ok(self.store.list(&filter).await?)
    }

    /// Fetches one content item by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for absent or soft-deleted rows.
    pub async fn get(&self, id: i64) -> Result<Content> {
        match self.store.find(id).await? {
            Some(content) if !content.is_deleted() => Ok(content),
            _ => Err(ServiceError::NotFound(id)),
        }
    }

    /// Soft-deletes a content item. The row is retained with `deleted_at`
    /// set and disappears from listings.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the item is absent or
    /// already deleted.
    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;
        match self.store.soft_delete(id).await {
            Ok(()) => {
                info!(id, "content soft-deleted");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(ServiceError::NotFound(id)),
            Err(store_error) => Err(store_error.into()),
        }
    }

    /// Submits feedback and recomputes the parent's rating aggregate.
    ///
    /// The aggregate is read back from the complete, current feedback set
    /// at the moment of recomputation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range rating or comment,
    /// [`ServiceError::NotFound`] when the content is absent or deleted,
    /// or a store error.
    pub async fn submit_feedback(&self, feedback: NewFeedback) -> Result<Feedback> {
        if !(1..=5).contains(&feedback.rating) {
            return Err(ServiceError::InvalidRating(feedback.rating));
        }
        let comment_len = feedback.comment.chars().count();
        if !(COMMENT_MIN..=COMMENT_MAX).contains(&comment_len) {
            return Err(ServiceError::InvalidComment(comment_len));
        }

        let content = self.get(feedback.content_id).await?;
        let saved = self.store.insert_feedback(&feedback).await?;

        let summary = self.store.aggregate_feedback(content.id).await?;
        self.store.update_rating(content.id, &summary).await?;
        info!(
            content_id = content.id,
            average_rating = summary.average_rating,
            rating_count = summary.rating_count,
            "rating aggregate recomputed"
        );

        Ok(saved)
    }
}
