//! WorldCat OpenSearch API adapter.

use serde_json::Value;
use tracing::{debug, warn};

use super::{FetchClient, FetchError, record_list};

/// Default WorldCat base URL.
const DEFAULT_BASE_URL: &str = "https://worldcat.org";

/// Searches the WorldCat catalog. Requires a `wskey` credential; absent key
/// degrades to a logged no-op.
#[derive(Debug, Clone)]
pub struct WorldCat {
    client: FetchClient,
    base_url: String,
    api_key: Option<String>,
}

impl WorldCat {
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

    /// Searches catalog entries matching `query`. Returns the provider-native
    /// `feed.entry` records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network or parse failure. A missing key
    /// yields an empty list with a logged warning.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Value>, FetchError> {
        let Some(api_key) = &self.api_key else {
            warn!("WORLDCAT_KEY not configured; skipping WorldCat fetch");
            return Ok(Vec::new());
        };

        debug!(query, "searching WorldCat");
        let url = format!(
            "{}/webservices/catalog/search/worldcat/opensearch",
            self.base_url
        );
        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("wskey", api_key.clone()),
            ("count", max_results.to_string()),
        ];
        let body = self.client.get_json(&url, &params).await?;
        Ok(record_list(&body, "/feed/entry", "worldcat"))
    }
}
