//! API integration tests
//!
//! Each test spawns its own server backed by the in-memory store, so no
//! external services are needed.
//!
//! Run with: cargo test -p feed-integration-tests --test api_tests

use std::time::Duration;

use feed_integration_tests::{
    assert_json, assert_status, fixtures::*, SseEvent, TestServer,
};
use feed_service::{PostPageResponse, PostResponse};
use reqwest::StatusCode;

const EVENT_WAIT: Duration = Duration::from_secs(5);

async fn add_post(server: &TestServer, identity: &str, body: &NewPostBody) -> PostResponse {
    let response = server.post_as("/api/posts", identity, body).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn set_typing(server: &TestServer, identity: &str, typing: bool) {
    let response = server
        .post_as("/api/posts/typing", identity, &TypingBody { typing })
        .await
        .unwrap();
    assert_status(&response, StatusCode::NO_CONTENT).unwrap();
}

async fn error_code(response: reqwest::Response, status: StatusCode) -> String {
    let body: ErrorEnvelope = assert_json(response, status).await.unwrap();
    body.error.code
}

fn typing_names(event: &SseEvent) -> Vec<String> {
    assert_eq!(event.event, "typing");
    event.json().unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();

    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

// ============================================================================
// Posting
// ============================================================================

#[tokio::test]
async fn test_add_post() {
    let server = TestServer::start().await.unwrap();
    let name = unique_name("carol");

    let post = add_post(&server, &name, &NewPostBody::text("hi")).await;

    assert_eq!(post.name, name);
    assert_eq!(post.text, "hi");
    assert_eq!(post.source, "GITHUB");
    assert!(!post.id.is_empty());
}

#[tokio::test]
async fn test_add_post_without_identity() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/posts", &NewPostBody::text("anonymous"))
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::UNAUTHORIZED).await,
        "MISSING_IDENTITY"
    );

    let response = server
        .post_as("/api/posts", "   ", &NewPostBody::text("blank"))
        .await
        .unwrap();
    assert_status(&response, StatusCode::UNAUTHORIZED).unwrap();
}

#[tokio::test]
async fn test_add_post_invalid_text() {
    let server = TestServer::start().await.unwrap();

    for text in [String::new(), "   ".to_string(), "x".repeat(4001)] {
        let response = server
            .post_as("/api/posts", "dave", &NewPostBody::text(text))
            .await
            .unwrap();
        assert_eq!(
            error_code(response, StatusCode::BAD_REQUEST).await,
            "VALIDATION_ERROR"
        );
    }

    let page: PostPageResponse =
        assert_json(server.get("/api/posts").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_add_post_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_as("/api/posts", "dave", &serde_json::json!({ "body": "wrong field" }))
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_BODY"
    );
}

#[tokio::test]
async fn test_add_post_duplicate_id() {
    let server = TestServer::start().await.unwrap();
    let body = NewPostBody::text("once").with_id("fixed-id");

    add_post(&server, "erin", &body).await;

    let response = server.post_as("/api/posts", "erin", &body).await.unwrap();
    assert_eq!(
        error_code(response, StatusCode::CONFLICT).await,
        "POST_ALREADY_EXISTS"
    );
}

#[tokio::test]
async fn test_set_typing() {
    let server = TestServer::start().await.unwrap();

    set_typing(&server, "bob", true).await;
    set_typing(&server, "bob", false).await;

    let response = server
        .post("/api/posts/typing", &TypingBody { typing: true })
        .await
        .unwrap();
    assert_status(&response, StatusCode::UNAUTHORIZED).unwrap();
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_posts_pages_through_cursor() {
    let server = TestServer::start().await.unwrap();
    for i in 1..=5 {
        add_post(&server, "gina", &NewPostBody::text(format!("post {i}")).with_id(format!("p{i}"))).await;
    }

    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let mut query = vec![("take", "2")];
        if let Some(cursor) = cursor.as_deref() {
            query.push(("cursor", cursor));
        }
        let page: PostPageResponse =
            assert_json(server.get_query("/api/posts", &query).await.unwrap(), StatusCode::OK)
                .await
                .unwrap();

        let ids: Vec<String> = page.items.into_iter().map(|p| p.id).collect();
        pages.push(ids);

        match page.next_cursor {
            Some(next) => cursor = Some(next.to_rfc3339()),
            None => break,
        }
    }

    assert_eq!(
        pages,
        vec![
            vec!["p4".to_string(), "p5".to_string()],
            vec!["p2".to_string(), "p3".to_string()],
            vec!["p1".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_list_posts_rejects_bad_take() {
    let server = TestServer::start().await.unwrap();

    for take in ["0", "51"] {
        let response = server
            .get_query("/api/posts", &[("take", take)])
            .await
            .unwrap();
        assert_eq!(
            error_code(response, StatusCode::BAD_REQUEST).await,
            "VALIDATION_ERROR"
        );
    }

    let response = server
        .get_query("/api/posts", &[("take", "ten")])
        .await
        .unwrap();
    assert_eq!(
        error_code(response, StatusCode::BAD_REQUEST).await,
        "INVALID_QUERY_PARAMETER"
    );
}

#[tokio::test]
async fn test_list_posts_default_page_size() {
    let server = TestServer::start().await.unwrap();
    for i in 0..12 {
        add_post(&server, "hal", &NewPostBody::text(format!("n{i}"))).await;
    }

    let page: PostPageResponse =
        assert_json(server.get("/api/posts").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(page.items.len(), 10);
    assert!(page.next_cursor.is_some());
    assert!(page
        .items
        .windows(2)
        .all(|w| w[0].created_at <= w[1].created_at));
}

// ============================================================================
// Live streams
// ============================================================================

#[tokio::test]
async fn test_post_stream_delivers_new_posts() {
    let server = TestServer::start().await.unwrap();
    let mut stream = server.open_stream("/api/posts/stream").await.unwrap();

    let first = add_post(&server, "ivy", &NewPostBody::text("first")).await;
    let second = add_post(&server, "ivy", &NewPostBody::text("second")).await;

    for expected in [first, second] {
        let event = stream.expect_event(EVENT_WAIT).await.unwrap();
        assert_eq!(event.event, "post");
        assert_eq!(event.json::<PostResponse>().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_typing_stream_follows_presence() {
    let server = TestServer::start().await.unwrap();
    let mut stream = server.open_stream("/api/typing/stream").await.unwrap();

    set_typing(&server, "zed", true).await;
    assert_eq!(typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()), vec!["zed"]);

    set_typing(&server, "amy", true).await;
    assert_eq!(
        typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()),
        vec!["amy", "zed"]
    );

    // posting clears the author's typing state
    add_post(&server, "zed", &NewPostBody::text("done")).await;
    assert_eq!(typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()), vec!["amy"]);

    set_typing(&server, "amy", false).await;
    assert!(typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()).is_empty());
}

#[tokio::test]
async fn test_stale_typing_is_swept() {
    let server = TestServer::start_with(&[
        ("FEED_PRESENCE_EXPIRY_MS", "200"),
        ("FEED_PRESENCE_SWEEP_INTERVAL_MS", "50"),
    ])
    .await
    .unwrap();
    let mut stream = server.open_stream("/api/typing/stream").await.unwrap();

    set_typing(&server, "bob", true).await;
    assert_eq!(typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()), vec!["bob"]);

    // no further typing updates; the sweeper evicts bob on its own
    assert!(typing_names(&stream.expect_event(EVENT_WAIT).await.unwrap()).is_empty());
}

#[tokio::test]
async fn test_shutdown_closes_streams() {
    let server = TestServer::start().await.unwrap();
    let mut stream = server.open_stream("/api/posts/stream").await.unwrap();

    tokio::time::timeout(EVENT_WAIT, server.shutdown())
        .await
        .expect("shutdown should not wait on open streams")
        .unwrap();

    let next = tokio::time::timeout(EVENT_WAIT, stream.next_event())
        .await
        .expect("stream should end after shutdown");
    assert!(next.map_or(true, |event| event.is_none()));
}
