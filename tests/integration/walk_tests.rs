//! Integration tests for the walker
//!
//! These tests use wiremock to stand up a small documentation tree and
//! run the full walk end-to-end, writing the catalog into a temporary
//! directory.

use setup_scout::config::{Config, FetcherConfig, OutputConfig, SiteConfig};
use setup_scout::crawler::crawl;
use setup_scout::storage::JsonCatalogStore;
use setup_scout::ScoutError;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HELLO_PAGE: &str = r#"<html><body>
    <h1>Hello</h1>
    <h2>Getting Started</h2>
    <p>Log into the codespace, then run</p>
    <pre><code class="language-bash">$ cd</code></pre>
    <ul>
      <li><code>wget https://cdn.example.edu/2024/x/hello.zip</code></li>
      <li><code>unzip hello.zip</code></li>
      <li><code>rm hello.zip</code></li>
      <li><code>cd hello</code></li>
      <li><code>ls</code></li>
      <li><code>hello.c</code></li>
    </ul>
    <h2>Specification</h2>
    <p><code>wget https://not.setup.example/</code></p>
</body></html>"#;

const MARIO_PAGE: &str = r#"<html><body>
    <h2>Distribution Code</h2>
    <p><code>wget https://cdn.example.edu/2024/x/mario-less.zip</code></p>
    <p><code>unzip mario-less.zip</code></p>
    <p>Then type <code>make mario</code></p>
</body></html>"#;

const NARRATIVE_PAGE: &str = r#"<html><body>
    <h2>Background</h2>
    <p>Nothing to download here.</p>
</body></html>"#;

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, catalog_path: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: format!("{}/", base_url),
            courses: vec!["x".to_string(), "web".to_string()],
            probe_courses: false,
            first_year: 2024,
            last_year: 2023,
            formats: vec!["psets".to_string(), "projects".to_string()],
        },
        fetcher: FetcherConfig {
            max_concurrent_requests: 3,
            max_attempts: 2,
            backoff_base_ms: 0, // no sleeping between retries
            ..FetcherConfig::default()
        },
        output: OutputConfig {
            catalog_path: catalog_path.display().to_string(),
        },
        ..Config::default()
    }
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// x/2024 uses psets with indices 0 and 1; x/2023 only has projects;
/// web has no years at all
async fn mount_tree(server: &MockServer) {
    mount_page(server, "/x/2024/", "CS50x 2024").await;
    mount_page(server, "/x/2024/psets/", "Problem Sets").await;
    mount_page(
        server,
        "/x/2024/psets/0/",
        r##"<a href="#hello">jump</a>
            <a href="hello/">Hello</a>
            <a href="hello/">Hello again</a>
            <a href="/x/2024/">Home</a>
            <a href="../1/">Next</a>
            <a href="https://cdn.example.edu/">CDN</a>"##,
    )
    .await;
    mount_page(server, "/x/2024/psets/0/hello/", HELLO_PAGE).await;
    mount_page(
        server,
        "/x/2024/psets/1/",
        r#"<a href="mario/less/">Mario (less)</a>
           <a href="reading/">Reading</a>"#,
    )
    .await;
    mount_page(server, "/x/2024/psets/1/mario/less/", MARIO_PAGE).await;
    mount_page(server, "/x/2024/psets/1/reading/", NARRATIVE_PAGE).await;

    // Index 2 is missing, so index 3 must never be requested
    Mock::given(method("GET"))
        .and(path("/x/2024/psets/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
        .expect(0)
        .mount(server)
        .await;

    mount_page(server, "/x/2023/", "CS50x 2023").await;
    mount_page(server, "/x/2023/projects/", "Projects").await;
    mount_page(server, "/x/2023/projects/0/", r#"<a href="hello/">Hello</a>"#).await;
    mount_page(server, "/x/2023/projects/0/hello/", HELLO_PAGE).await;
}

#[tokio::test]
async fn test_full_walk_builds_catalog() {
    let mock_server = MockServer::start().await;
    mount_tree(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog_path = dir.path().join("catalog.json");
    let config = create_test_config(&mock_server.uri(), &catalog_path);

    let (catalog, report) = crawl(&config).await.expect("Walk failed");

    let keys: Vec<&str> = catalog.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![
            "x/2023/projects/0/hello",
            "x/2024/psets/0/hello",
            "x/2024/psets/1/mario/less",
        ]
    );

    let hello = catalog.get("x/2024/psets/0/hello").unwrap();
    assert_eq!(
        hello.commands.as_slice(),
        [
            "wget https://cdn.example.edu/2024/x/hello.zip",
            "unzip hello.zip",
            "rm hello.zip",
            "cd hello",
            "ls",
        ]
    );

    let mario = catalog.get("x/2024/psets/1/mario/less").unwrap();
    assert_eq!(mario.source, "x/2024/psets/1/mario/less");
    assert_eq!(
        mario.commands.as_slice(),
        [
            "wget https://cdn.example.edu/2024/x/mario-less.zip",
            "unzip mario-less.zip",
        ]
    );

    assert_eq!(report.years_found, 2);
    assert_eq!(report.index_pages, 3);
    assert_eq!(report.problems_recorded, 3);
    assert_eq!(report.problems_dropped, 1);
    // x/2024, x/2023, final
    assert_eq!(report.checkpoints, 3);

    let persisted = JsonCatalogStore::new(&catalog_path)
        .load()
        .expect("Failed to load catalog");
    assert_eq!(persisted, catalog);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_tree(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir.path().join("catalog.json"));
    crawl(&config).await.expect("Walk failed");

    let requests = mock_server.received_requests().await.unwrap();
    let hello_fetches = requests
        .iter()
        .filter(|r| r.url.path() == "/x/2024/psets/0/hello/")
        .count();
    assert_eq!(hello_fetches, 1);
    assert!(requests.iter().all(|r| r.url.path() != "/x/2024/psets/3/"));
}

#[tokio::test]
async fn test_rerun_produces_identical_catalog_file() {
    let mock_server = MockServer::start().await;
    mount_tree(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog_path = dir.path().join("catalog.json");
    let config = create_test_config(&mock_server.uri(), &catalog_path);

    let (first, _) = crawl(&config).await.expect("First walk failed");
    let first_bytes = std::fs::read(&catalog_path).unwrap();

    let (second, _) = crawl(&config).await.expect("Second walk failed");
    let second_bytes = std::fs::read(&catalog_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn test_site_without_any_years_yields_empty_catalog() {
    let mock_server = MockServer::start().await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog_path = dir.path().join("catalog.json");
    let config = create_test_config(&mock_server.uri(), &catalog_path);

    let (catalog, report) = crawl(&config).await.expect("Walk failed");

    assert!(catalog.is_empty());
    assert_eq!(report.checkpoints, 1);
    assert_eq!(std::fs::read_to_string(&catalog_path).unwrap().trim(), "{}");
}

#[tokio::test]
async fn test_unwritable_catalog_aborts_walk() {
    let mock_server = MockServer::start().await;
    mount_tree(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let catalog_path = dir.path().join("missing").join("catalog.json");
    let config = create_test_config(&mock_server.uri(), &catalog_path);

    let result = crawl(&config).await;

    assert!(matches!(result, Err(ScoutError::Storage(_))));
    assert!(!catalog_path.exists());
}
