//! Integration tests for the source adapters and the shared fetch policy.
//!
//! Every provider is simulated with wiremock; nothing here touches the
//! network.

use std::time::{Duration, Instant};

use maktaba_core::fetch::{
    ArchiveOrg, FetchClient, FetchError, GoogleBooks, LibraryOfCongress, OpenLibrary, RetryConfig,
    WorldCat, YouTube,
};
use serde_json::json;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A client with a short timeout and fast retries suitable for tests.
fn test_client(max_attempts: u32, delay: Duration) -> FetchClient {
    FetchClient::new(Duration::from_secs(5), RetryConfig::new(max_attempts, delay))
        .expect("client build should succeed")
}

#[tokio::test]
async fn test_transient_500_is_retried_until_success() {
    let server = MockServer::start().await;

    // Two failures, then a valid body. The failure mock is mounted first and
    // expires after two matches.
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"docs": [{"title": "Recovered"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let delay = Duration::from_millis(100);
    let adapter = OpenLibrary::with_base_url(test_client(3, delay), server.uri());

    let start = Instant::now();
    let records = adapter.search("history", "eng", 5).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(records.len(), 1);
    assert!(
        elapsed >= delay * 2,
        "two retries should wait at least {:?}, waited {elapsed:?}",
        delay * 2
    );
}

#[tokio::test]
async fn test_exhausted_retries_return_final_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let adapter =
        OpenLibrary::with_base_url(test_client(3, Duration::from_millis(10)), server.uri());
    let error = adapter.search("history", "eng", 5).await.unwrap_err();

    match error {
        FetchError::Status { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Status error, got: {other}"),
    }
}

#[tokio::test]
async fn test_client_error_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let adapter =
        OpenLibrary::with_base_url(test_client(3, Duration::from_millis(10)), server.uri());
    let error = adapter.search("history", "eng", 5).await.unwrap_err();

    match error {
        FetchError::Status { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Status error, got: {other}"),
    }
}

#[tokio::test]
async fn test_missing_api_key_skips_request_entirely() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(1, Duration::from_millis(10));
    let google = GoogleBooks::with_base_url(client.clone(), None, server.uri());
    assert!(google.search("history", "en", 5).await.unwrap().is_empty());

    let youtube = YouTube::with_base_url(client.clone(), None, server.uri());
    assert!(youtube.search("algebra lesson", 5).await.unwrap().is_empty());

    let worldcat = WorldCat::with_base_url(client.clone(), None, server.uri());
    assert!(worldcat.search("history", 5).await.unwrap().is_empty());

    let loc = LibraryOfCongress::with_base_url(client, None, server.uri());
    assert!(loc.search("history", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_wrapped_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odd"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not json at all")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&server)
        .await;

    let client = test_client(1, Duration::from_millis(10));
    let body = client
        .get_json(&format!("{}/odd", server.uri()), &[])
        .await
        .unwrap();

    assert_eq!(body, json!({"text": "not json at all"}));
}

#[tokio::test]
async fn test_adapter_treats_wrapped_text_as_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>rate limited</html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let adapter =
        OpenLibrary::with_base_url(test_client(1, Duration::from_millis(10)), server.uri());
    let records = adapter.search("history", "eng", 5).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_google_books_sends_key_and_extracts_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/volumes"))
        .and(query_param("q", "history"))
        .and(query_param("key", "secret"))
        .and(query_param("langRestrict", "ar"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "v1", "volumeInfo": {"title": "One"}},
                {"id": "v2", "volumeInfo": {"title": "Two"}},
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = GoogleBooks::with_base_url(
        test_client(1, Duration::from_millis(10)),
        Some("secret".to_string()),
        server.uri(),
    );
    let records = adapter.search("history", "ar", 10).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], "v1");
}

#[tokio::test]
async fn test_worldcat_extracts_feed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webservices/catalog/search/worldcat/opensearch"))
        .and(query_param("wskey", "wc-key"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feed": {"entry": [{"id": "oclc1", "title": "Atlas"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = WorldCat::with_base_url(
        test_client(1, Duration::from_millis(10)),
        Some("wc-key".to_string()),
        server.uri(),
    );
    let records = adapter.search("atlas", 5).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "oclc1");
}

#[tokio::test]
async fn test_loc_extracts_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books/"))
        .and(query_param("fo", "json"))
        .and(query_param("apikey", "loc-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "loc1", "title": "Archive Finds"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = LibraryOfCongress::with_base_url(
        test_client(1, Duration::from_millis(10)),
        Some("loc-key".to_string()),
        server.uri(),
    );
    let records = adapter.search("archives", 5).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_archive_restricts_media_type_and_extracts_docs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advancedsearch.php"))
        .and(query_param("output", "json"))
        .and(query_param("fq[]", "mediatype:(audio)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"docs": [{"identifier": "rec1", "title": "Recitation"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter =
        ArchiveOrg::with_base_url(test_client(1, Duration::from_millis(10)), server.uri());
    let records = adapter.search("bukhari", "audio", 15).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["identifier"], "rec1");
}

#[tokio::test]
async fn test_youtube_extracts_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("part", "snippet"))
        .and(query_param("type", "video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": {"videoId": "yt1"}, "snippet": {"title": "Lesson"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = YouTube::with_base_url(
        test_client(1, Duration::from_millis(10)),
        Some("yt-key".to_string()),
        server.uri(),
    );
    let records = adapter.search("algebra lesson", 5).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_empty_envelope_yields_no_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"numFound": 0})))
        .mount(&server)
        .await;

    let adapter =
        OpenLibrary::with_base_url(test_client(1, Duration::from_millis(10)), server.uri());
    let records = adapter.search("nothing", "eng", 5).await.unwrap();
    assert!(records.is_empty());
}
