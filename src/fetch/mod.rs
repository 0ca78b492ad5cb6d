//! Source adapters for external content providers.
//!
//! One module per provider, all built on the shared [`FetchClient`] retry
//! helper:
//! - [`GoogleBooks`] - Google Books volumes API (keyed)
//! - [`OpenLibrary`] - Open Library search API (keyless)
//! - [`WorldCat`] - WorldCat OpenSearch API (keyed)
//! - [`LibraryOfCongress`] - loc.gov books API (keyed)
//! - [`ArchiveOrg`] - Internet Archive advanced search (keyless)
//! - [`YouTube`] - YouTube Data API search (keyed)
//!
//! Adapters return the provider-native record list untouched; mapping into
//! the canonical shape is the `normalize` module's job. Failures surface as
//! [`FetchError`] so the calling generator decides policy (log and continue,
//! typically). The one exception is a missing API credential, which is a
//! logged no-op yielding an empty result.

mod archive_org;
mod google_books;
mod http;
mod loc;
mod open_library;
mod worldcat;
mod youtube;

pub use archive_org::ArchiveOrg;
pub use google_books::GoogleBooks;
pub use http::{FetchClient, RetryConfig, USER_AGENT};
pub use loc::LibraryOfCongress;
pub use open_library::OpenLibrary;
pub use worldcat::WorldCat;
pub use youtube::YouTube;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default number of records requested per provider query.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Errors from source adapter calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request exceeded the configured total timeout.
    #[error("request to {url} timed out")]
    Timeout {
        /// The requested URL.
        url: String,
    },

    /// A transport-level failure (DNS, connection refused, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be parsed.
    #[error("could not parse response from {url}: {reason}")]
    Malformed {
        /// The requested URL.
        url: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl FetchError {
    /// Whether a retry may succeed: timeouts and 5xx responses are
    /// transient; everything else fails immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Extracts the provider's record list from a parsed response body.
///
/// Providers wrap their results differently (`.items`, `.docs`,
/// `.response.docs`, `.feed.entry`, ...); `pointer` is the JSON pointer to
/// the array. A missing or non-array value yields an empty list, which
/// adapters treat as "no results".
fn record_list(body: &Value, pointer: &str, provider: &str) -> Vec<Value> {
    match body.pointer(pointer).and_then(Value::as_array) {
        Some(records) => records.clone(),
        None => {
            debug!(provider, pointer, "no record list in provider response");
            Vec::new()
        }
    }
}
