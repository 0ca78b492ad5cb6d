//! Internet Archive advanced-search adapter.

use serde_json::Value;
use tracing::debug;

use super::{FetchClient, FetchError, record_list};

/// Default archive.org base URL.
const DEFAULT_BASE_URL: &str = "https://archive.org";

/// Searches the Internet Archive, optionally restricted to one media type
/// (`texts`, `audio`, ...). No credential required.
#[derive(Debug, Clone)]
pub struct ArchiveOrg {
    client: FetchClient,
    base_url: String,
}

impl ArchiveOrg {
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

    /// Searches items matching `query`, most-downloaded first. `media_type`
    /// filters the search when non-empty. Returns the provider-native
    /// `response.docs` records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network or parse failure.
    pub async fn search(
        &self,
        query: &str,
        media_type: &str,
        max_results: u32,
    ) -> Result<Vec<Value>, FetchError> {
        debug!(query, media_type, "searching Internet Archive");
        let url = format!("{}/advancedsearch.php", self.base_url);
        let mut params = vec![
            ("q", query.to_string()),
            ("output", "json".to_string()),
            ("rows", max_results.to_string()),
            (
                "fl[]",
                "identifier,title,description,creator,date,subject,mediatype".to_string(),
            ),
            ("sort[]", "downloads desc".to_string()),
        ];
        if !media_type.is_empty() {
            params.push(("fq[]", format!("mediatype:({media_type})")));
        }
        let body = self.client.get_json(&url, &params).await?;
        Ok(record_list(&body, "/response/docs", "archive_org"))
    }
}
