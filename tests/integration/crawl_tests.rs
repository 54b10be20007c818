//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small encyclopedia and run the full
//! crawl and render cycle end-to-end over HTTP.

use topic_digest::config::Config;
use topic_digest::crawler::crawl_session;
use topic_digest::output::{render_digest, INTRODUCTION_UNAVAILABLE};
use topic_digest::{crawl_topic, DigestError, LinkState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.crawler.max_depth = max_depth;
    config.crawler.request_delay = 0;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

/// Renders an article with a "See also" list and in-body links
fn article(title: &str, related: &[&str], content: &[&str]) -> String {
    let content_html: String = content
        .iter()
        .map(|c| format!(r#"<a href="/wiki/{}">{}</a> "#, c, c.replace('_', " ")))
        .collect();
    let related_html: String = related
        .iter()
        .map(|r| format!(r#"<li><a href="/wiki/{}">{}</a></li>"#, r, r.replace('_', " ")))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html><head><title>{title} - Wikipedia</title></head>
<body>
<h1 id="firstHeading">{title}</h1>
<div id="mw-content-text"><div class="mw-parser-output">
<p>{title} intro. {content_html}</p>
<h2><span class="mw-headline" id="See_also">See also</span></h2>
<ul>{related_html}</ul>
</div></div>
</body></html>"#
    )
}

/// Mounts an HTML page at /wiki/{name}
async fn mount_article(server: &MockServer, name: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_renders_ranked_digest() {
    let mock_server = MockServer::start().await;

    mount_article(
        &mock_server,
        "Graph_theory",
        article("Graph theory", &["Alpha", "Beta", "Gamma"], &["Hub"]),
    )
    .await;
    mount_article(&mock_server, "Hub", article("Hub", &[], &[])).await;
    mount_article(&mock_server, "Alpha", article("Alpha", &["Alpha_one"], &[])).await;
    mount_article(&mock_server, "Beta", article("Beta", &["Beta_one", "Beta_two"], &[])).await;
    mount_article(&mock_server, "Gamma", article("Gamma", &[], &[])).await;
    for leaf in ["Alpha_one", "Beta_one", "Beta_two"] {
        mount_article(&mock_server, leaf, article(&leaf.replace('_', " "), &[], &[])).await;
    }

    let mut config = create_test_config(&mock_server.uri(), 2);
    config.output.max_print_depth = 1;
    config.output.top_k = Some(2);

    let session = crawl_session(&config, "Graph theory")
        .await
        .expect("Crawl should succeed");

    assert_eq!(session.root_title, "Graph theory");
    assert_eq!(session.stats.pages_analyzed(), 8);
    assert_eq!(session.stats.total_edges, 7);
    assert!(session.database.get("beta two").is_some());

    let digest = render_digest(&session, &config.output);
    assert!(digest.starts_with("# Graph theory\n"));
    assert!(digest.contains("Graph theory intro."));

    let subtopics = digest
        .split("## Key Subtopics")
        .nth(1)
        .expect("Digest should list subtopics");
    let headings: Vec<&str> = subtopics
        .lines()
        .filter(|line| line.starts_with('#'))
        .collect();

    // Beta has two children, Alpha one; print depth 1 hides grandchildren
    assert_eq!(headings, vec!["## Beta", "## Alpha"]);
    assert!(subtopics.contains(&format!("[Link to page]({}/wiki/Beta)", mock_server.uri())));
    assert!(subtopics.contains("\nBeta intro.\n"));
}

#[tokio::test]
async fn test_crawl_topic_returns_digest() {
    let mock_server = MockServer::start().await;

    mount_article(&mock_server, "Tree", article("Tree (graph theory)", &["Forest"], &[])).await;
    mount_article(&mock_server, "Forest", article("Forest", &[], &[])).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let digest = crawl_topic(&config, "/wiki/Tree")
        .await
        .expect("Crawl should succeed");

    assert!(digest.starts_with("# Tree (graph theory)\n"));
    assert!(digest.contains("## Key Subtopics"));
    assert!(digest.contains("## Forest"));
    assert!(digest.contains("\nForest intro.\n"));
}

#[tokio::test]
async fn test_unreachable_seed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let result = crawl_session(&config, "Missing").await;

    match result {
        Err(DigestError::SeedUnreachable { url }) => {
            assert!(url.ends_with("/wiki/Missing"));
        }
        Err(other) => panic!("expected SeedUnreachable, got {}", other),
        Ok(_) => panic!("expected SeedUnreachable, got a session"),
    }
}

#[tokio::test]
async fn test_invalid_seed_is_rejected_before_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let result = crawl_session(&config, "https://example.org/not/an/article").await;
    assert!(matches!(result, Err(DigestError::InvalidSeed(_))));
}

#[tokio::test]
async fn test_depth_bound_is_respected() {
    let mock_server = MockServer::start().await;

    mount_article(&mock_server, "Root", article("Root", &["Child"], &[])).await;
    mount_article(&mock_server, "Child", article("Child", &["Deep"], &["Deep"])).await;

    // Child sits at the maximum depth, so its links are never followed
    Mock::given(method("GET"))
        .and(path("/wiki/Deep"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(article("Deep", &[], &[]), "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let session = crawl_session(&config, "Root")
        .await
        .expect("Crawl should succeed");

    assert_eq!(session.edges.len(), 1);
    assert_eq!(session.stats.pages_analyzed(), 2);
    assert_eq!(session.stats.pages_by_depth.get(&1), Some(&1));
}

#[tokio::test]
async fn test_non_html_child_is_a_failed_fetch() {
    let mock_server = MockServer::start().await;

    mount_article(&mock_server, "Root", article("Root", &["Data", "Prose"], &[])).await;
    mount_article(&mock_server, "Prose", article("Prose", &[], &[])).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"k": 1}"#, "application/json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let session = crawl_session(&config, "Root")
        .await
        .expect("Crawl should succeed");

    assert_eq!(session.stats.count(LinkState::FetchFailed), 1);
    assert_eq!(session.stats.pages_analyzed(), 2);
    assert!(session.database.get("Data").is_none());

    // The edge survives the failed fetch, so the topic is still rendered
    assert_eq!(session.edges.len(), 2);
    let digest = render_digest(&session, &config.output);
    assert!(digest.contains("## Data"));
    assert!(digest.contains(INTRODUCTION_UNAVAILABLE));
    assert!(digest.contains("## Prose"));
}

#[tokio::test]
async fn test_server_error_on_child_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;

    mount_article(&mock_server, "Root", article("Root", &["Broken", "Fine"], &[])).await;
    mount_article(&mock_server, "Fine", article("Fine", &[], &[])).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let session = crawl_session(&config, "Root")
        .await
        .expect("Crawl should succeed");

    assert_eq!(session.stats.count(LinkState::FetchFailed), 1);
    assert!(session.database.get("Fine").is_some());
}
