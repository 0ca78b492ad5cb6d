//! SQLite-backed implementation of the [`ContentStore`] contract.
//!
//! Tags and authors are stored as JSON array columns; timestamps as
//! RFC 3339 text. All queries are runtime-checked `sqlx::query` calls with
//! manual row mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::instrument;

use crate::content::{Content, ContentDraft, Feedback, NewFeedback, RatingSummary};
use crate::db::Database;

use super::{ContentFilter, ContentStore, Result, StoreError};

/// Columns fetched for every content row.
const CONTENT_COLUMNS: &str = "id, title, description, thumbnail, source, source_id, source_url, \
     content_type, tags, language, authors, average_rating, rating_count, added_at, deleted_at";

/// SQLite content store over a shared [`Database`] pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Creates a store over an initialized database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Decodes a JSON array column into a string vector.
fn decode_list(raw: &str, column: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|error| StoreError::Corrupt(format!("{column} is not a JSON array: {error}")))
}

/// Encodes a string slice as a JSON array column value.
fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn row_to_content(row: &SqliteRow) -> Result<Content> {
    let content_type: String = row.try_get("content_type")?;
    let tags: String = row.try_get("tags")?;
    let authors: String = row.try_get("authors")?;

    Ok(Content {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        thumbnail: row.try_get("thumbnail")?,
        source: row.try_get("source")?,
        source_id: row.try_get("source_id")?,
        source_url: row.try_get("source_url")?,
        content_type: content_type
            .parse()
            .map_err(StoreError::Corrupt)?,
        tags: decode_list(&tags, "tags")?,
        language: row.try_get("language")?,
        authors: decode_list(&authors, "authors")?,
        average_rating: row.try_get("average_rating")?,
        rating_count: row.try_get("rating_count")?,
        added_at: row.try_get("added_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

/// Returns `Ok(())` if at least one row was affected; otherwise
/// [`StoreError::NotFound`].
fn check_affected(id: i64, rows_affected: u64) -> Result<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound(id))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    #[instrument(skip(self))]
    async fn find_by_source(&self, source: &str, source_id: &str) -> Result<Option<Content>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE source = ? AND source_id = ? LIMIT 1"
        ))
        .bind(source)
        .bind(source_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_content).transpose()
    }

    #[instrument(skip(self, draft), fields(key = %draft.dedup_key()))]
    async fn insert(&self, draft: &ContentDraft) -> Result<Content> {
        let added_at: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            "INSERT INTO content \
             (title, description, thumbnail, source, source_id, source_url, content_type, \
              tags, language, authors, average_rating, rating_count, added_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0.0, 0, ?)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.thumbnail)
        .bind(&draft.source)
        .bind(&draft.source_id)
        .bind(&draft.source_url)
        .bind(draft.content_type.as_str())
        .bind(encode_list(&draft.tags))
        .bind(&draft.language)
        .bind(encode_list(&draft.authors))
        .bind(added_at)
        .execute(self.db.pool())
        .await?;

        Ok(Content {
            id: result.last_insert_rowid(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            thumbnail: draft.thumbnail.clone(),
            source: draft.source.clone(),
            source_id: draft.source_id.clone(),
            source_url: draft.source_url.clone(),
            content_type: draft.content_type,
            tags: draft.tags.clone(),
            language: draft.language.clone(),
            authors: draft.authors.clone(),
            average_rating: 0.0,
            rating_count: 0,
            added_at,
            deleted_at: None,
        })
    }

    #[instrument(skip(self))]
    async fn find(&self, id: i64) -> Result<Option<Content>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE id = ? LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_content).transpose()
    }

    #[instrument(skip(self, filter), fields(content_type = %filter.content_type))]
    async fn list(&self, filter: &ContentFilter) -> Result<Vec<Content>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE deleted_at IS NULL AND content_type = "
        ));
        builder.push_bind(filter.content_type.as_str());

        if let Some(query) = filter.query.as_deref() {
            let pattern = format!("%{query}%");
            builder.push(" AND (title LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description LIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        // Tags are a JSON array column; match each required tag as a quoted
        // JSON string element.
        for tag in &filter.tags {
            builder.push(" AND tags LIKE ");
            builder.push_bind(format!("%\"{tag}\"%"));
        }

        let page = filter.page.max(1);
        let offset = i64::from(page - 1) * i64::from(filter.page_size);
        builder.push(" ORDER BY added_at DESC LIMIT ");
        builder.push_bind(i64::from(filter.page_size));
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(row_to_content).collect()
    }

    #[instrument(skip(self, summary))]
    async fn update_rating(&self, id: i64, summary: &RatingSummary) -> Result<()> {
        let result = sqlx::query(
            "UPDATE content SET average_rating = ?, rating_count = ? WHERE id = ?",
        )
        .bind(summary.average_rating)
        .bind(summary.rating_count)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        check_affected(id, result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: i64) -> Result<()> {
        let deleted_at: DateTime<Utc> = Utc::now();
        let result =
            sqlx::query("UPDATE content SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(deleted_at)
                .bind(id)
                .execute(self.db.pool())
                .await?;

        check_affected(id, result.rows_affected())
    }

    #[instrument(skip(self, feedback), fields(content_id = feedback.content_id))]
    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let created_at: DateTime<Utc> = Utc::now();

        let result = sqlx::query(
            "INSERT INTO feedback (content_id, user, rating, comment, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(feedback.content_id)
        .bind(&feedback.user)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(created_at)
        .execute(self.db.pool())
        .await?;

        Ok(Feedback {
            id: result.last_insert_rowid(),
            content_id: feedback.content_id,
            user: feedback.user.clone(),
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            created_at,
        })
    }

    #[instrument(skip(self))]
    async fn aggregate_feedback(&self, content_id: i64) -> Result<RatingSummary> {
        let row = sqlx::query(
            "SELECT AVG(rating) AS average_rating, COUNT(*) AS rating_count \
             FROM feedback WHERE content_id = ?",
        )
        .bind(content_id)
        .fetch_one(self.db.pool())
        .await?;

        // AVG over zero rows is NULL.
        let average_rating: Option<f64> = row.try_get("average_rating")?;
        let rating_count: i64 = row.try_get("rating_count")?;

        Ok(RatingSummary {
            average_rating: average_rating.unwrap_or(0.0),
            rating_count,
        })
    }
}
