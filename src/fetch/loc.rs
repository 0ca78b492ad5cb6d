//! Library of Congress books API adapter.

use serde_json::Value;
use tracing::{debug, warn};

use super::{FetchClient, FetchError, record_list};

/// Default loc.gov base URL.
const DEFAULT_BASE_URL: &str = "https://www.loc.gov";

/// Searches the Library of Congress book catalog. Requires an API key;
/// absent key degrades to a logged no-op.
#[derive(Debug, Clone)]
pub struct LibraryOfCongress {
    client: FetchClient,
    base_url: String,
    api_key: Option<String>,
}

impl LibraryOfCongress {
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

    /// Searches books matching `query`. Returns the provider-native
    /// `results` records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network or parse failure. A missing key
    /// yields an empty list with a logged warning.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Value>, FetchError> {
        let Some(api_key) = &self.api_key else {
            warn!("LOC_API_KEY not configured; skipping Library of Congress fetch");
            return Ok(Vec::new());
        };

        debug!(query, "searching Library of Congress");
        let url = format!("{}/books/", self.base_url);
        let params = [
            ("fo", "json".to_string()),
            ("q", query.to_string()),
            ("apikey", api_key.clone()),
            ("c", max_results.to_string()),
        ];
        let body = self.client.get_json(&url, &params).await?;
        Ok(record_list(&body, "/results", "loc"))
    }
}
