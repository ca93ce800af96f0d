mod common;

use axum::http::StatusCode;
use common::{InMemoryLinkRepository, create_test_state, test_server, test_server_with_limits};
use golinks::api::middleware::rate_limit::RateLimitSettings;
use golinks::domain::entities::JumpType;
use std::sync::Arc;

#[tokio::test]
async fn test_redirect_simple() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("google", "https://google.com", JumpType::Simple);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/google").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://google.com");
}

#[tokio::test]
async fn test_simple_ignores_query() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("google", "https://google.com/?hl=en", JumpType::Simple);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server
        .get("/go/google")
        .add_query_param("hl", "de")
        .await;

    assert_eq!(response.header("location"), "https://google.com/?hl=en");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/missing").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_empty_path_is_not_found() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("docs/", "https://docs.rs", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    server.get("/go/").await.assert_status_not_found();
    server.get("/go").await.assert_status_not_found();
}

#[tokio::test]
async fn test_prefix_appends_suffix() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("docs/", "https://docs.rs", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/docs/serde/latest").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://docs.rs/serde/latest");
}

#[tokio::test]
async fn test_prefix_slug_itself_redirects_to_destination() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("docs/", "https://docs.rs/", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/docs/").await;

    assert_eq!(response.header("location"), "https://docs.rs/");
}

#[tokio::test]
async fn test_greatest_prefix_wins() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("a/", "https://a.example", JumpType::Prefix);
    repo.insert("a/b/", "https://ab.example", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/a/b/c").await;

    assert_eq!(response.header("location"), "https://ab.example/c");
}

#[tokio::test]
async fn test_exact_beats_prefix() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("team/", "https://wiki.example/team", JumpType::Prefix);
    repo.insert("team/oncall", "https://pager.example", JumpType::Simple);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/team/oncall").await;

    assert_eq!(response.header("location"), "https://pager.example");
}

#[tokio::test]
async fn test_inactive_link_is_not_matched() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert_inactive("old", "https://old.example", JumpType::Simple);
    repo.insert_inactive("a/b/", "https://ab.example", JumpType::Prefix);
    repo.insert("a/", "https://a.example", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    server.get("/go/old").await.assert_status_not_found();

    let response = server.get("/go/a/b/c").await;
    assert_eq!(response.header("location"), "https://a.example/b/c");
}

#[tokio::test]
async fn test_forward_merges_query() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("x", "https://x.com/?a=1", JumpType::Forward);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server
        .get("/go/x")
        .add_query_param("a", "2")
        .add_query_param("b", "3")
        .await;

    assert_eq!(response.header("location"), "https://x.com/?a=2&b=3");
}

#[tokio::test]
async fn test_prefix_forward_appends_and_merges() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("search/", "https://search.example/s", JumpType::PrefixForward);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server
        .get("/go/search/rust")
        .add_query_param("lang", "en")
        .await;

    assert_eq!(
        response.header("location"),
        "https://search.example/s/rust?lang=en"
    );
}

#[tokio::test]
async fn test_redirect_enqueues_exactly_one_click() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let id = repo.insert("gh", "https://github.com", JumpType::Simple);
    let (state, mut rx) = create_test_state(repo);
    let server = test_server(state);

    server.get("/go/gh").await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.link_id, id);
    assert_eq!(event.slug, "gh");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_not_found_enqueues_no_click() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let (state, mut rx) = create_test_state(repo);
    let server = test_server(state);

    server.get("/go/nothing").await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_succeeds_when_click_queue_is_closed() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("gh", "https://github.com", JumpType::Simple);
    let (state, rx) = create_test_state(repo);
    drop(rx);
    let server = test_server(state);

    let response = server.get("/go/gh").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_click_worker_persists_clicks() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let id = repo.insert("gh", "https://github.com", JumpType::Simple);
    let (state, rx) = create_test_state(repo.clone());
    tokio::spawn(golinks::domain::click_worker::run_click_worker(
        rx,
        repo.clone(),
    ));
    let server = test_server(state);

    server.get("/go/gh").await;
    server.get("/go/gh").await;

    for _ in 0..100 {
        if repo.clicks(id) == 2 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(repo.clicks(id), 2);
}

#[tokio::test]
async fn test_redirect_is_rate_limited() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("gh", "https://github.com", JumpType::Simple);
    let (state, _rx) = create_test_state(repo);
    let server = test_server_with_limits(
        state,
        RateLimitSettings {
            per_second: 1,
            burst: 1,
            behind_proxy: false,
        },
    );

    let first = server.get("/go/gh").await;
    let second = server.get("/go/gh").await;

    assert_eq!(first.status_code(), StatusCode::FOUND);
    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_non_ascii_suffix_is_percent_encoded() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("wiki/", "https://en.wikipedia.org/wiki", JumpType::Prefix);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/wiki/Caf%C3%A9").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "https://en.wikipedia.org/wiki/Caf%C3%A9"
    );
}

#[tokio::test]
async fn test_idn_destination_is_percent_encoded() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    repo.insert("books", "https://bücher.example/", JumpType::Simple);
    let (state, _rx) = create_test_state(repo);
    let server = test_server(state);

    let response = server.get("/go/books").await;

    assert_eq!(response.header("location"), "https://b%C3%BCcher.example/");
}
