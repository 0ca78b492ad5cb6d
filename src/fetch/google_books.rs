//! Google Books volumes API adapter.

use serde_json::Value;
use tracing::{debug, warn};

use super::{FetchClient, FetchError, record_list};

/// Default Google Books API base URL.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Searches book volumes via the Google Books API.
///
/// Requires an API key; when none is configured the adapter degrades to a
/// logged no-op so the rest of the pipeline keeps running.
#[derive(Debug, Clone)]
pub struct GoogleBooks {
    client: FetchClient,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooks {
    /// Creates an adapter against the production API.
    #[must_use]
    pub fn new(client: FetchClient, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Creates an adapter with a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(
        client: FetchClient,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Searches volumes matching `query` restricted to `lang`.
    ///
    /// Returns provider-native volume records (the `items` array).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network or parse failure. A missing API key
    /// is not an error: it yields an empty list with a logged warning.
    pub async fn search(
        &self,
        query: &str,
        lang: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, FetchError> {
        let Some(api_key) = &self.api_key else {
            warn!("GOOGLE_BOOKS_API_KEY not configured; skipping Google Books fetch");
            return Ok(Vec::new());
        };

        debug!(query, lang, "searching Google Books");
        let url = format!("{}/volumes", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("key", api_key.clone()),
            ("langRestrict", lang.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        let body = self.client.get_json(&url, &params).await?;
        Ok(record_list(&body, "/items", "google_books"))
    }
}
