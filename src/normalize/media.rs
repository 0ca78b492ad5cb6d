//! Normalizers for the media providers (Internet Archive, YouTube).
//!
//! Both take a content-type hint because the same provider serves multiple
//! domains: the Archive yields books and hadith audio, YouTube yields
//! educational videos.

use serde_json::Value;

use crate::content::{ContentDraft, ContentType};

use super::language_or_default;
use super::text::{DESCRIPTION_MAX, clip, non_empty, sanitize, string_list};

/// Normalizes an Internet Archive search doc.
///
/// Thumbnail and canonical link are both derived from the `identifier`;
/// descriptions are sometimes one-element lists, which the sanitizer
/// flattens.
#[must_use]
pub fn archive_item(record: &Value, content_type: ContentType) -> ContentDraft {
    let identifier = sanitize(record.pointer("/identifier"));
    let (thumbnail, source_url) = if identifier.is_empty() {
        (None, None)
    } else {
        (
            Some(format!("https://archive.org/services/img/{identifier}")),
            Some(format!("https://archive.org/details/{identifier}")),
        )
    };

    ContentDraft {
        title: sanitize(record.pointer("/title")),
        description: clip(&sanitize(record.pointer("/description")), DESCRIPTION_MAX),
        thumbnail,
        source: "Internet Archive".to_string(),
        source_id: identifier,
        source_url,
        content_type,
        tags: string_list(record.pointer("/subject")),
        language: super::DEFAULT_LANGUAGE.to_string(),
        authors: string_list(record.pointer("/creator")),
    }
}

/// Normalizes a YouTube search result.
///
/// The video id lives under `id.videoId`; the channel title is recorded as
/// the single author.
#[must_use]
pub fn youtube_video(record: &Value, content_type: ContentType) -> ContentDraft {
    let video_id = sanitize(record.pointer("/id/videoId"));
    let source_url = non_empty(if video_id.is_empty() {
        String::new()
    } else {
        format!("https://www.youtube.com/watch?v={video_id}")
    });
    let channel = sanitize(record.pointer("/snippet/channelTitle"));
    let authors = if channel.is_empty() { vec![] } else { vec![channel] };

    ContentDraft {
        title: sanitize(record.pointer("/snippet/title")),
        description: clip(
            &sanitize(record.pointer("/snippet/description")),
            DESCRIPTION_MAX,
        ),
        thumbnail: non_empty(sanitize(record.pointer("/snippet/thumbnails/high/url"))),
        source: "YouTube".to_string(),
        source_id: video_id,
        source_url,
        content_type,
        tags: string_list(record.pointer("/snippet/tags")),
        language: language_or_default(sanitize(record.pointer("/snippet/defaultAudioLanguage"))),
        authors,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_archive_item_derives_urls_from_identifier() {
        let record = json!({
            "identifier": "sahih-bukhari-audio",
            "title": "Sahih al-Bukhari readings",
            "description": ["Complete recitation.", "extra"],
            "subject": "hadith,audio",
            "creator": ["Reciter"],
        });

        let draft = archive_item(&record, ContentType::Hadith);
        assert_eq!(draft.source, "Internet Archive");
        assert_eq!(draft.source_id, "sahih-bukhari-audio");
        assert_eq!(
            draft.source_url.as_deref(),
            Some("https://archive.org/details/sahih-bukhari-audio")
        );
        assert_eq!(
            draft.thumbnail.as_deref(),
            Some("https://archive.org/services/img/sahih-bukhari-audio")
        );
        assert_eq!(draft.description, "Complete recitation.");
        assert_eq!(draft.content_type, ContentType::Hadith);
        assert_eq!(draft.tags, vec!["hadith", "audio"]);
    }

    #[test]
    fn test_archive_item_without_identifier_fails_gate() {
        let draft = archive_item(&json!({"title": "Nameless"}), ContentType::Book);
        assert!(draft.source_id.is_empty());
        assert!(draft.thumbnail.is_none());
        assert!(draft.source_url.is_none());
        assert!(!draft.is_acceptable());
    }

    #[test]
    fn test_youtube_video_mapping() {
        let record = json!({
            "id": {"videoId": "abc123"},
            "snippet": {
                "title": "Algebra lesson",
                "description": "Solving equations.",
                "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/abc123/hq.jpg"}},
                "tags": ["math", "algebra"],
                "defaultAudioLanguage": "ar",
                "channelTitle": "Math Channel",
            }
        });

        let draft = youtube_video(&record, ContentType::Educational);
        assert_eq!(draft.source_id, "abc123");
        assert_eq!(
            draft.source_url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(draft.authors, vec!["Math Channel"]);
        assert_eq!(draft.content_type, ContentType::Educational);
    }

    #[test]
    fn test_youtube_video_without_id_fails_gate() {
        let record = json!({"snippet": {"title": "No id"}});
        let draft = youtube_video(&record, ContentType::Educational);
        assert!(!draft.is_acceptable());
        assert!(draft.source_url.is_none());
        assert!(draft.authors.is_empty());
        assert_eq!(draft.language, "ar");
    }
}
