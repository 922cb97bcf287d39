//! HTTP surface tests.
//!
//! Each request is driven through the full router with `oneshot`; rate
//! limiting stays off since there is no peer address to key on.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::{raw_likes, raw_posts, TestHarness, TEST_TOKEN};
use proxy_core::domains::webhooks::SubscriptionRegistry;
use proxy_core::kernel::{MockScraper, ScrapeKind};
use proxy_core::server::{build_app, AppState};

struct TestApp {
    router: Router,
    harness: TestHarness,
}

impl TestApp {
    fn new(scraper: MockScraper) -> Self {
        Self::with_defaults(scraper, None, None)
    }

    fn with_defaults(
        scraper: MockScraper,
        default_token: Option<&str>,
        default_profile: Option<&str>,
    ) -> Self {
        let harness = TestHarness::new(scraper);
        let state = AppState {
            engine: harness.engine.clone(),
            webhooks: Arc::new(SubscriptionRegistry::new()),
            default_profile: default_profile.map(str::to_string),
        };
        let router = build_app(state, default_token.map(str::to_string), None).unwrap();
        Self { router, harness }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header("x-apify-token", TEST_TOKEN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("x-apify-token", TEST_TOKEN)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

// =============================================================================
// Health / fallback
// =============================================================================

#[tokio::test]
async fn health_reports_cache_stats() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"]["entries"], 0);
    assert_eq!(body["cache"]["trackedInteractions"], 0);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app.get("/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Endpoint not found");
    assert!(body["timestamp"].is_string());
}

// =============================================================================
// Posts
// =============================================================================

#[tokio::test]
async fn list_posts_returns_envelope() {
    let app = TestApp::new(
        MockScraper::new().with_items(ScrapeKind::ProfilePosts, raw_posts(9002, 2)),
    );

    let (status, body) = app.get("/api/posts?username=alice&max_posts=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["totalPosts"], 2);
    assert_eq!(data["posts"][0]["id"], "9002");
    assert_eq!(data["posts"][0]["authorName"], "Alice Liddell");
    assert_eq!(data["newPostIds"], json!(["9002", "9001"]));
    assert_eq!(data["profileUrl"], "https://www.linkedin.com/in/alice/");
    assert_eq!(app.harness.scraper.calls()[0].limit(), 2);
}

#[tokio::test]
async fn unparseable_max_posts_falls_back_to_default() {
    let app = TestApp::new(MockScraper::new());

    let (status, _) = app.get("/api/posts?username=alice&max_posts=lots").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.harness.scraper.calls()[0].limit(), 10);
}

#[tokio::test]
async fn token_from_query_param_is_accepted() {
    let app = TestApp::new(MockScraper::new());

    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/posts?username=alice&apify_token=from-query")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.harness.scraper.call_count(), 1);
}

#[tokio::test]
async fn missing_token_is_rejected_before_upstream() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/posts?username=alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Missing Apify token"));
    assert_eq!(app.harness.scraper.call_count(), 0);
}

#[tokio::test]
async fn configured_defaults_fill_token_and_profile() {
    let app = TestApp::with_defaults(MockScraper::new(), Some("default-token"), Some("bob"));

    let (status, body) = app
        .send(Request::builder().uri("/api/posts").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["profileUrl"], "https://www.linkedin.com/in/bob/");
}

#[tokio::test]
async fn missing_profile_is_rejected() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app.get("/api/posts").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Missing profile"));
    assert_eq!(app.harness.scraper.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let app = TestApp::new(
        MockScraper::new().with_failure(ScrapeKind::ProfilePosts, "Apify run failed"),
    );

    let (status, body) = app.get("/api/posts?username=alice").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Apify run failed"));
}

#[tokio::test]
async fn check_new_posts_without_cache_is_true() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app.get("/api/check-new-posts?username=alice").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hasNewPosts"], true);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(app.harness.scraper.call_count(), 0);
}

#[tokio::test]
async fn refresh_metrics_returns_matching_posts() {
    let app = TestApp::new(
        MockScraper::new().with_items(ScrapeKind::ProfilePosts, raw_posts(9003, 3)),
    );

    let (status, body) = app
        .post_json(
            "/api/posts/refresh-metrics",
            json!({ "username": "alice", "postIds": ["9002"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["posts"][0]["id"], "9002");
}

#[tokio::test]
async fn refresh_metrics_requires_post_ids() {
    let app = TestApp::new(MockScraper::new());

    let (status, _) = app
        .post_json("/api/posts/refresh-metrics", json!({ "username": "alice" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.harness.scraper.call_count(), 0);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app
        .post_raw("/api/posts/compare-metrics", "{not json".to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn compare_metrics_without_snapshots_marks_all_changed() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app
        .post_json(
            "/api/posts/compare-metrics",
            json!({ "posts": [{ "id": "1", "likes": 5, "comments": 1, "reposts": 0 }] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], json!(["1"]));
    assert_eq!(body["data"]["unchanged"], json!([]));
    assert_eq!(body["data"]["details"][0]["changes"]["likes"], 5);
}

// =============================================================================
// Interactions
// =============================================================================

#[tokio::test]
async fn interactions_returns_only_new_ones() {
    let app = TestApp::new(
        MockScraper::new().with_items(ScrapeKind::PostLikers, raw_likes(1..=3)),
    );

    let (status, body) = app
        .get("/api/interactions/1234?current_likes=3&current_comments=0")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["postId"], "1234");
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["interactions"][0]["type"], "like");

    let (_, again) = app
        .get("/api/interactions/1234?current_likes=3&current_comments=0")
        .await;
    assert_eq!(again["data"]["total"], 0);
    assert_eq!(app.harness.scraper.call_count(), 1);
}

// =============================================================================
// Webhooks / cache
// =============================================================================

#[tokio::test]
async fn webhook_subscription_lifecycle() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app
        .post_json(
            "/webhook/subscribe",
            json!({ "url": "https://hooks.test/a", "events": ["new_post", "new_interaction"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subscription"]["url"], "https://hooks.test/a");

    let (_, listed) = app.get("/webhook/list").await;
    assert_eq!(listed["data"]["total"], 1);
    assert_eq!(
        listed["data"]["subscriptions"][0]["events"],
        json!(["new_post", "new_interaction"])
    );

    let (_, removed) = app
        .post_json("/webhook/unsubscribe", json!({ "url": "https://hooks.test/a" }))
        .await;
    assert_eq!(removed["data"]["removed"], true);

    let (_, missing) = app
        .post_json("/webhook/unsubscribe", json!({ "url": "https://hooks.test/a" }))
        .await;
    assert_eq!(missing["data"]["removed"], false);
    assert_eq!(missing["data"]["message"], "Webhook not found");
}

#[tokio::test]
async fn subscribe_requires_url_and_events() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app
        .post_json("/webhook/subscribe", json!({ "url": "https://hooks.test/a" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: url, events");
}

#[tokio::test]
async fn unknown_event_name_is_bad_request() {
    let app = TestApp::new(MockScraper::new());

    let (status, _) = app
        .post_json(
            "/webhook/subscribe",
            json!({ "url": "https://hooks.test/a", "events": ["new_follower"] }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cache_clear_reports_removed_entries() {
    let app = TestApp::new(MockScraper::new());

    let (status, body) = app.post_json("/cache/clear", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 0);
}
