//! Integration tests for the HTTP fetcher
//!
//! These run the real reqwest-backed transport against wiremock servers
//! to check status classification and retry counts.

use setup_scout::config::FetcherConfig;
use setup_scout::crawler::{
    build_http_client, FetchError, FetchOutcome, Fetcher, HttpTransport, RetryPolicy,
};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(max_attempts: u32) -> Fetcher<HttpTransport> {
    let config = FetcherConfig {
        request_timeout_secs: 2,
        connect_timeout_secs: 2,
        ..FetcherConfig::default()
    };
    let client = build_http_client(&config).expect("Failed to build client");
    Fetcher::new(
        HttpTransport::new(client),
        2,
        RetryPolicy::immediate(max_attempts),
    )
}

fn url_for(server: &MockServer, at: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), at)).expect("Failed to parse URL")
}

#[tokio::test]
async fn test_success_returns_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/2024/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("CS50x 2024"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher(3).fetch(&url_for(&mock_server, "/x/2024/")).await;

    assert_eq!(outcome.body(), Some("CS50x 2024"));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/2006/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher(3).fetch(&url_for(&mock_server, "/x/2006/")).await;

    assert!(matches!(outcome, FetchOutcome::NotFound));
}

#[tokio::test]
async fn test_server_error_exhausts_attempts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/2024/psets/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let outcome = fetcher(3)
        .fetch(&url_for(&mock_server, "/x/2024/psets/"))
        .await;

    assert!(matches!(outcome, FetchOutcome::Failed(FetchError::Status(500))));
}

#[tokio::test]
async fn test_recovers_after_transient_error() {
    let mock_server = MockServer::start().await;
    // First request fails, the mock then stops matching and the next one succeeds
    Mock::given(method("GET"))
        .and(path("/ai/2024/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ai/2024/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("CS50 AI"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetcher(3).fetch(&url_for(&mock_server, "/ai/2024/")).await;

    assert_eq!(outcome.body(), Some("CS50 AI"));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/x/2024/"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x/2024/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("CS50x 2024"))
        .mount(&mock_server)
        .await;

    let outcome = fetcher(1).fetch(&url_for(&mock_server, "/x/")).await;

    match outcome {
        FetchOutcome::Success {
            body,
            status,
            final_url,
        } => {
            assert_eq!(body, "CS50x 2024");
            assert_eq!(status, 200);
            assert_eq!(final_url.path(), "/x/2024/");
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_a_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let outcome = fetcher(1).fetch(&url_for(&mock_server, "/slow/")).await;

    assert!(matches!(outcome, FetchOutcome::Failed(FetchError::Transport(_))));
}
