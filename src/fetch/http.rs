//! Shared HTTP fetch policy for source adapters.
//!
//! Centralizes the networking defaults every adapter relies on: a fixed
//! User-Agent, one total timeout per request, and fixed-delay retry on
//! transient failures (timeout or 5xx). Non-retryable failures (4xx,
//! transport errors, malformed bodies) are returned immediately.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tracing::warn;

use super::FetchError;

/// User-Agent sent on every adapter request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Retry behavior for transient failures.
///
/// The delay is fixed between attempts; `max_attempts` counts the initial
/// request, so the worst-case added latency per call is
/// `(max_attempts - 1) * delay`.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum attempts including the first (>= 1).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::DEFAULT_MAX_RETRIES,
            delay: Duration::from_secs(crate::config::DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryConfig {
    /// Creates a retry config, clamping `max_attempts` to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// HTTP client shared by all source adapters.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    retry: RetryConfig,
}

impl FetchClient {
    /// Builds a client with the given total request timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when reqwest client construction
    /// fails.
    pub fn new(timeout: Duration, retry: RetryConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client, retry })
    }

    /// Issues a GET and parses the body, retrying transient failures.
    ///
    /// A 200 response with a JSON content type is parsed into a [`Value`];
    /// any other 200 body is wrapped as `{"text": <body>}` so adapters can
    /// decide what to do with it. Timeouts and 5xx statuses are retried up
    /// to the configured attempt cap with a fixed inter-attempt delay; 4xx
    /// statuses and transport errors fail immediately.
    ///
    /// # Errors
    ///
    /// Returns the final [`FetchError`] once retries are exhausted, or the
    /// first non-transient error.
    pub async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        let mut attempt = 1;
        loop {
            match self.get_once(url, params).await {
                Ok(body) => return Ok(body),
                Err(error) if error.is_transient() && attempt < self.retry.max_attempts => {
                    warn!(url, attempt, %error, "transient fetch failure; retrying");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn get_once(&self, url: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Transport {
                        url: url.to_string(),
                        source,
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        if is_json {
            response.json().await.map_err(|source| {
                if source.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Malformed {
                        url: url.to_string(),
                        reason: source.to_string(),
                    }
                }
            })
        } else {
            // Some providers mislabel JSON or return plain text; hand the
            // raw body to the adapter instead of failing the call.
            let text = response.text().await.map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
            warn!(url, "non-JSON response body; wrapping as text");
            Ok(json!({ "text": text }))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_clamps_attempts_to_one() {
        let retry = RetryConfig::new(0, Duration::from_millis(10));
        assert_eq!(retry.max_attempts, 1);
    }

    #[test]
    fn test_retry_config_defaults() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.delay, Duration::from_secs(2));
    }
}
