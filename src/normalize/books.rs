//! Normalizers for the book catalog providers.

use serde_json::Value;

use crate::content::{ContentDraft, ContentType};

use super::text::{DESCRIPTION_MAX, clip, non_empty, sanitize, string_list};
use super::language_or_default;

/// Normalizes a Google Books volume record.
#[must_use]
pub fn google_book(record: &Value) -> ContentDraft {
    ContentDraft {
        title: sanitize(record.pointer("/volumeInfo/title")),
        description: clip(
            &sanitize(record.pointer("/volumeInfo/description")),
            DESCRIPTION_MAX,
        ),
        thumbnail: non_empty(sanitize(record.pointer("/volumeInfo/imageLinks/thumbnail"))),
        source: "Google Books".to_string(),
        source_id: sanitize(record.pointer("/id")),
        source_url: non_empty(sanitize(record.pointer("/volumeInfo/infoLink"))),
        content_type: ContentType::Book,
        tags: string_list(record.pointer("/volumeInfo/categories")),
        language: language_or_default(sanitize(record.pointer("/volumeInfo/language"))),
        authors: string_list(record.pointer("/volumeInfo/authors")),
    }
}

/// Normalizes an Open Library search doc.
///
/// The record `key` looks like `/works/OL12345W`; its tail is the source id
/// and the full key path becomes the canonical link. Cover images are
/// addressed by the numeric `cover_i`.
#[must_use]
pub fn open_library_book(record: &Value) -> ContentDraft {
    let key = sanitize(record.pointer("/key"));
    let source_id = key.rsplit('/').next().unwrap_or_default().to_string();
    let source_url = non_empty(if key.is_empty() {
        String::new()
    } else {
        format!("https://openlibrary.org{key}")
    });
    let thumbnail = record
        .pointer("/cover_i")
        .and_then(Value::as_i64)
        .map(|cover_id| format!("https://covers.openlibrary.org/b/id/{cover_id}-M.jpg"));
    let language = sanitize(record.pointer("/languages/0/key")).replace("/languages/", "");

    ContentDraft {
        title: sanitize(record.pointer("/title")),
        // first_sentence may be a plain string or a one-element list
        description: clip(&sanitize(record.pointer("/first_sentence")), DESCRIPTION_MAX),
        thumbnail,
        source: "Open Library".to_string(),
        source_id,
        source_url,
        content_type: ContentType::Book,
        tags: string_list(record.pointer("/subject")),
        language: language_or_default(language),
        authors: string_list(record.pointer("/author_name")),
    }
}

/// Normalizes a WorldCat OpenSearch entry.
#[must_use]
pub fn worldcat_book(record: &Value) -> ContentDraft {
    ContentDraft {
        title: sanitize(record.pointer("/title")),
        description: clip(&sanitize(record.pointer("/summary")), DESCRIPTION_MAX),
        thumbnail: non_empty(sanitize(record.pointer("/thumbnail"))),
        source: "WorldCat".to_string(),
        source_id: sanitize(record.pointer("/id")),
        source_url: non_empty(sanitize(record.pointer("/link/href"))),
        content_type: ContentType::Book,
        tags: string_list(record.pointer("/category")),
        language: super::DEFAULT_LANGUAGE.to_string(),
        authors: string_list(record.pointer("/author")),
    }
}

/// Normalizes a Library of Congress result record.
#[must_use]
pub fn loc_book(record: &Value) -> ContentDraft {
    ContentDraft {
        title: sanitize(record.pointer("/title")),
        description: clip(&sanitize(record.pointer("/description")), DESCRIPTION_MAX),
        thumbnail: non_empty(sanitize(record.pointer("/image_url"))),
        source: "Library of Congress".to_string(),
        source_id: sanitize(record.pointer("/id")),
        source_url: non_empty(sanitize(record.pointer("/url"))),
        content_type: ContentType::Book,
        tags: string_list(record.pointer("/subject")),
        language: super::DEFAULT_LANGUAGE.to_string(),
        authors: string_list(record.pointer("/creator")),
    }
}
