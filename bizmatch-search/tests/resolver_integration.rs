//! Integration tests for the full resolver pipeline.
//!
//! A wiremock server plays both the directory API and the business pages,
//! so these run the real HTTP collaborators and JSON-LD parser without
//! touching the network.

use bizmatch_search::{parse_suggestion_link, Resolver, SearchConfig, SearchError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUSINESS_PAGE: &str = include_str!("../test-data/business_page.html");

fn config_for(server: &MockServer) -> SearchConfig {
    let mut config = SearchConfig::default();
    config.directory.api_base_url = server.uri();
    config.directory.api_token = Some("test-token".into());
    config.pages.site_base_url = server.uri();
    config.timeout_seconds = 5;
    config
}

async fn mount_directory(server: &MockServer, term: &str, businesses: serde_json::Value) {
    let total = businesses.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .and(query_param("term", term))
        .and(query_param("location", "New York, NY"))
        .and(query_param("categories", "pizza"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": total,
            "businesses": businesses,
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, id: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/biz/{id}")))
        .and(query_param("sort_by", "date_desc"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn two_block_page() -> String {
    BUSINESS_PAGE.replace(
        "<link rel=\"stylesheet\"",
        "<script type=\"application/ld+json\">{\"@type\": \"BreadcrumbList\"}</script>\n  <link rel=\"stylesheet\"",
    )
}

#[tokio::test]
async fn confident_match_returns_summary_and_first_reviews() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizza",
        json!([
            {"id": "joes-pizza-new-york", "name": "Joe's Pizza"},
            {"id": "marios-pizza-new-york", "name": "Mario's Pizza"}
        ]),
    )
    .await;
    mount_page(&server, "joes-pizza-new-york", html(BUSINESS_PAGE), 1).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizza", Some(2)).await.expect("search");

    let summary = result.summary.expect("summary");
    assert_eq!(summary.name, "Joe's Pizza");
    assert_eq!(summary.address, "7 Carmine St, New York, NY 10014");
    assert_eq!(summary.review_count, 1523);
    assert_eq!(summary.requested_review_count, 2);
    assert_eq!(
        summary.source_url,
        format!("{}/biz/joes-pizza-new-york", server.uri())
    );
    assert_eq!(result.reviews.len(), 2);
    assert_eq!(result.reviews[0].published_date, "2024-03-02");
    assert_eq!(result.reviews[1].published_date, "2024-02-18");
    assert!(result.suggestions.is_empty());
    assert!(result.review_error.is_none());
}

#[tokio::test]
async fn equally_confident_candidates_become_suggestions() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizza",
        json!([
            {"id": "joes-pizza-new-york", "name": "Joe's Pizza"},
            {"id": "joes-pizza-broadway", "name": "Joe's Pizza"}
        ]),
    )
    .await;
    mount_page(&server, "joes-pizza-new-york", html(BUSINESS_PAGE), 1).await;
    mount_page(&server, "joes-pizza-broadway", html(BUSINESS_PAGE), 0).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizza", Some(3)).await.expect("search");

    assert!(result.summary.is_some());
    assert_eq!(result.reviews.len(), 3);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].name, "Joe's Pizza");
    assert_eq!(
        result.suggestions[0].link,
        "/search?id=joes-pizza-broadway&n=3"
    );
}

#[tokio::test]
async fn uncertain_match_returns_suggestions_without_fetching_pages() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizza",
        json!([
            {"id": "lombardis-pizza", "name": "Lombardi's Pizza"},
            {"id": "sushi-nakazawa", "name": "Sushi Nakazawa"}
        ]),
    )
    .await;
    mount_page(&server, "lombardis-pizza", html(BUSINESS_PAGE), 0).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizza", Some(1)).await.expect("search");

    assert!(result.summary.is_none());
    assert!(result.reviews.is_empty());
    let names: Vec<_> = result.suggestions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Lombardi's Pizza"]);
}

#[tokio::test]
async fn misspelled_query_still_shows_reviews() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizzaa",
        json!([
            {"id": "joes-pizza-new-york", "name": "Joe's Pizza"},
            {"id": "marios-pizza-new-york", "name": "Mario's Pizza"}
        ]),
    )
    .await;
    mount_page(&server, "joes-pizza-new-york", html(BUSINESS_PAGE), 1).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizzaa", Some(1)).await.expect("search");

    assert_eq!(result.summary.expect("summary").name, "Joe's Pizza");
    assert_eq!(result.reviews.len(), 1);
    let names: Vec<_> = result.suggestions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Mario's Pizza"]);
}

#[tokio::test]
async fn empty_directory_is_empty_result() {
    let server = MockServer::start().await;
    mount_directory(&server, "nowhere pizza", json!([])).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Nowhere Pizza", None).await.expect("search");

    assert!(result.is_empty());
    assert!(result.reviews.is_empty());
}

#[tokio::test]
async fn redesigned_page_keeps_suggestions_and_reports_page_format() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizza",
        json!([
            {"id": "joes-pizza-new-york", "name": "Joe's Pizza"},
            {"id": "joes-pizza-broadway", "name": "Joe's Pizza"}
        ]),
    )
    .await;
    mount_page(&server, "joes-pizza-new-york", html(&two_block_page()), 1).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizza", Some(3)).await.expect("search");

    assert!(result.summary.is_none());
    assert!(result.reviews.is_empty());
    assert_eq!(result.suggestions.len(), 1);
    let failure = result.review_error.expect("review error");
    assert_eq!(failure.kind, "page_format");
    assert!(!failure.retryable);
    assert!(failure.message.contains("found 2"));
}

#[tokio::test]
async fn page_server_error_is_retryable_fetch_failure() {
    let server = MockServer::start().await;
    mount_directory(
        &server,
        "joes pizza",
        json!([{"id": "joes-pizza-new-york", "name": "Joe's Pizza"}]),
    )
    .await;
    mount_page(&server, "joes-pizza-new-york", ResponseTemplate::new(503), 1).await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.search("Joe's Pizza", None).await.expect("search");

    let failure = result.review_error.expect("review error");
    assert_eq!(failure.kind, "fetch");
    assert!(failure.retryable);
}

#[tokio::test]
async fn directory_auth_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/businesses/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "TOKEN_INVALID", "description": "Invalid access token"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let err = resolver.search("Joe's Pizza", None).await.unwrap_err();

    assert!(matches!(err, SearchError::Fetch(_)));
    assert!(err.to_string().contains("401"));
    assert!(!err.to_string().contains("test-token"));
}

#[tokio::test]
async fn suggestion_link_reenters_review_scraper() {
    let server = MockServer::start().await;
    mount_page(&server, "joes-pizza-broadway", html(BUSINESS_PAGE), 1).await;

    let (id, count) =
        parse_suggestion_link("/search?id=joes-pizza-broadway&n=10").expect("valid link");
    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let result = resolver.lookup(&id, Some(count)).await.expect("lookup");

    let summary = result.summary.expect("summary");
    assert_eq!(summary.requested_review_count, 10);
    assert_eq!(result.reviews.len(), 3);
    assert!(result.suggestions.is_empty());
}

#[tokio::test]
async fn lookup_on_redesigned_page_is_page_format_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "joes-pizza-new-york",
        html("<html><body>New look!</body></html>"),
        1,
    )
    .await;

    let resolver = Resolver::from_config(config_for(&server)).expect("resolver");
    let err = resolver
        .lookup("joes-pizza-new-york", Some(3))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::PageFormat(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
#[ignore] // Live test, needs BIZMATCH_TOKEN. Run with `cargo test -- --ignored`
async fn live_search() {
    let mut config = SearchConfig::default();
    config.directory.api_token = std::env::var("BIZMATCH_TOKEN").ok();
    let resolver = Resolver::from_config(config).expect("resolver");
    let result = resolver.search("Joe's Pizza", Some(3)).await.expect("live search");
    assert!(!result.is_empty());
}
