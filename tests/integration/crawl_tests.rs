//! Integration tests for the crawler
//!
//! These tests use wiremock to serve politifact-shaped pages and run the
//! full listing-to-storage cycle end-to-end against a temporary database.

use factsweep::config::{Config, CrawlConfig, StoreConfig};
use factsweep::crawler::crawl;
use factsweep::storage::{ArticleStore, SqliteStore};
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn test_config(server_uri: &str) -> Config {
    // Extract the host (e.g. "127.0.0.1") so the mock server is in scope
    let host = url::Url::parse(server_uri)
        .expect("Failed to parse server URI")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    Config {
        crawl: CrawlConfig {
            seed: format!("{server_uri}/factchecks/"),
            allowed_domains: vec![host],
            parallelism: 4,
            request_timeout_secs: 5,
            user_agent: "factsweep-test/1.0".to_string(),
        },
        store: StoreConfig::default(),
    }
}

fn listing_html(hrefs: &[&str]) -> String {
    let teasers: String = hrefs
        .iter()
        .map(|href| {
            format!(r#"<div class="m-statement__quote"><a href="{href}">a claim</a></div>"#)
        })
        .collect();
    format!("<html><body><section>{teasers}</section></body></html>")
}

fn article_html(title: &str, rating: &str) -> String {
    format!(
        r#"<html><body><main>
        <h2 class="c-title">{title}</h2>
        <div class="m-author__content"><a href="/staff/writer/">A Writer</a></div>
        <span class="m-author__date">March 5, 2021</span>
        <div class="m-statement__desc">stated on March 3, 2021 in a post </div>
        <div class="m-statement__quote-wrap"><div class="m-statement__quote">the claim text</div></div>
        <div class="m-statement__meter"><img class="c-image__original" src="meter.png" alt="{rating}"></div>
        <ul class="m-list m-list--horizontal"><li><a class="c-tag"><span>Economy</span></a></li></ul>
        <section id="sources"><article><p>A cited source</p></article></section>
        </main></body></html>"#
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Opens a store on a fresh temp path, returning the store and the path
/// so the database can be reopened for verification after the crawl.
fn temp_store(dir: &tempfile::TempDir) -> (SqliteStore, PathBuf) {
    let db_path = dir.path().join("test.db");
    let store = SqliteStore::open(&db_path, "articles").expect("Failed to open store");
    (store, db_path)
}

#[tokio::test]
async fn test_crawl_collects_every_listed_article() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&[
            "/factchecks/2021/mar/01/claim-a/",
            "/factchecks/2021/mar/02/claim-b/",
            "/factchecks/2021/mar/03/claim-c/",
        ])))
        .mount(&mock_server)
        .await;

    let articles = [
        ("/factchecks/2021/mar/01/claim-a/", "claim-a", "true"),
        ("/factchecks/2021/mar/02/claim-b/", "claim-b", "mostly-false"),
        ("/factchecks/2021/mar/03/claim-c/", "claim-c", "pants-fire"),
    ];
    for (route, id, rating) in articles {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html_response(article_html(&format!("Title {id}"), rating)))
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = crawl(&test_config(&mock_server.uri()), store)
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_visited, 4);
    assert_eq!(summary.links_discovered, 3);
    assert_eq!(summary.records_extracted, 3);
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.failed_upserts, 0);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 3);

    let stored = reopened.get_article("claim-b").unwrap().unwrap();
    assert_eq!(stored.title, "Title claim-b");
    assert_eq!(stored.rating, "mostly-false");
    assert_eq!(stored.claim, "the claim text");
    assert_eq!(stored.claim_date, "March 3, 2021");
    assert_eq!(stored.author, "A Writer");
    assert_eq!(stored.tags, vec!["Economy"]);
    assert_eq!(stored.sources, vec!["A cited source"]);
    assert!(stored.url.ends_with("/factchecks/2021/mar/02/claim-b/"));
}

#[tokio::test]
async fn test_crawl_waits_for_slow_article_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&[
            "/factchecks/fast-one/",
            "/factchecks/fast-two/",
            "/factchecks/slow-one/",
            "/factchecks/slow-two/",
        ])))
        .mount(&mock_server)
        .await;

    for id in ["fast-one", "fast-two"] {
        Mock::given(method("GET"))
            .and(path(format!("/factchecks/{id}/")))
            .respond_with(html_response(article_html(id, "true")))
            .mount(&mock_server)
            .await;
    }
    for id in ["slow-one", "slow-two"] {
        Mock::given(method("GET"))
            .and(path(format!("/factchecks/{id}/")))
            .respond_with(
                html_response(article_html(id, "false")).set_delay(Duration::from_millis(300)),
            )
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    // The crawl must not report completion until the delayed article pages
    // have been fetched and stored.
    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        crawl(&test_config(&mock_server.uri()), store),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    assert_eq!(summary.records_extracted, 4);
    assert_eq!(summary.inserted, 4);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 4);
    assert!(reopened.get_article("slow-two").unwrap().is_some());
}

#[tokio::test]
async fn test_failed_article_fetch_does_not_abort_the_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&[
            "/factchecks/good-one/",
            "/factchecks/broken/",
            "/factchecks/good-two/",
        ])))
        .mount(&mock_server)
        .await;

    for id in ["good-one", "good-two"] {
        Mock::given(method("GET"))
            .and(path(format!("/factchecks/{id}/")))
            .respond_with(html_response(article_html(id, "half-true")))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/factchecks/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = crawl(&test_config(&mock_server.uri()), store)
        .await
        .expect("crawl failed");

    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.inserted, 2);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 2);
    assert!(reopened.get_article("broken").unwrap().is_none());
}

#[tokio::test]
async fn test_links_outside_allowed_domains_are_not_fetched() {
    let mock_server = MockServer::start().await;
    let port = url::Url::parse(&mock_server.uri())
        .unwrap()
        .port()
        .expect("mock server has a port");

    // Same server, different hostname, so the scope check is the only
    // thing standing between the crawler and this page.
    let outside = format!("http://localhost:{port}/outside/");

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&[
            "/factchecks/inside/",
            outside.as_str(),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/factchecks/inside/"))
        .respond_with(html_response(article_html("inside", "true")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/outside/"))
        .respond_with(html_response(article_html("outside", "true")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = crawl(&test_config(&mock_server.uri()), store)
        .await
        .expect("crawl failed");

    assert_eq!(summary.links_discovered, 2);
    assert_eq!(summary.links_out_of_scope, 1);
    assert_eq!(summary.inserted, 1);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert!(reopened.get_article("inside").unwrap().is_some());
    assert!(reopened.get_article("outside").unwrap().is_none());
}

#[tokio::test]
async fn test_repeated_links_upsert_into_one_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&[
            "/factchecks/repeated/",
            "/factchecks/repeated/",
        ])))
        .mount(&mock_server)
        .await;

    // No link dedup: each occurrence is fetched again.
    Mock::given(method("GET"))
        .and(path("/factchecks/repeated/"))
        .respond_with(html_response(article_html("repeated", "true")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = crawl(&test_config(&mock_server.uri()), store)
        .await
        .expect("crawl failed");

    assert_eq!(summary.records_extracted, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 1);
}

#[tokio::test]
async fn test_pages_without_article_region_are_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(html_response(listing_html(&["/factchecks/not-article/"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/factchecks/not-article/"))
        .respond_with(html_response(
            "<html><body><div>interstitial page, no article markup</div></body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = crawl(&test_config(&mock_server.uri()), store)
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.non_articles, 1);
    assert_eq!(summary.records_extracted, 0);
    assert_eq!(summary.inserted, 0);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 0);
}

#[tokio::test]
async fn test_seed_fetch_failure_terminates_cleanly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factchecks/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (store, db_path) = temp_store(&dir);

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        crawl(&test_config(&mock_server.uri()), store),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    assert_eq!(summary.pages_visited, 0);
    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.links_discovered, 0);
    assert_eq!(summary.inserted, 0);

    let reopened = SqliteStore::open(&db_path, "articles").unwrap();
    assert_eq!(reopened.article_count().unwrap(), 0);
}
