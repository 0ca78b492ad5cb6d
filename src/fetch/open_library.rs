//! Open Library search API adapter.

use serde_json::Value;
use tracing::debug;

use super::{FetchClient, FetchError, record_list};

/// Default Open Library base URL.
const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Searches books via the Open Library search API. No credential required.
#[derive(Debug, Clone)]
pub struct OpenLibrary {
    client: FetchClient,
    base_url: String,
}

impl OpenLibrary {
    /// Creates an adapter against the production API.
    #[must_use]
    pub fn new(client: FetchClient) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Creates an adapter with a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(client: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Searches books matching `query` in `lang` (three-letter code, e.g.
    /// `ara`). Returns the provider-native `docs` records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network or parse failure.
    pub async fn search(
        &self,
        query: &str,
        lang: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, FetchError> {
        debug!(query, lang, "searching Open Library");
        let url = format!("{}/search.json", self.base_url);
        let params = [
            ("q", query.to_string()),
            ("limit", max_results.to_string()),
            ("language", lang.to_string()),
        ];
        let body = self.client.get_json(&url, &params).await?;
        Ok(record_list(&body, "/docs", "open_library"))
    }
}
