//! Cross-cutting behavior: banner, headers, rate limiting, body parsing.

use std::collections::HashMap;

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_root_banner() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "app-root, development mode");

    let mut config = common::test_config();
    config.mode = "production".into();
    let prod = common::spawn_app_with(config).await;
    let res = prod.client.get(prod.url("/")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "app-root, production mode");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/crud-operations/count")).send().await.unwrap();
    let headers = res.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("x-frame-options"));
    assert!(headers.contains_key("x-request-id"));

    let res = app
        .client
        .get(app.url("/"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn test_security_headers_can_be_disabled() {
    let mut config = common::test_config();
    config.security.enable_headers = false;
    let app = common::spawn_app_with(config).await;

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert!(!res.headers().contains_key("x-content-type-options"));
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let mut config = common::test_config();
    config.rate_limit.max_requests = 3;
    let app = common::spawn_app_with(config).await;

    for _ in 0..3 {
        let res = app.client.get(app.url("/")).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert!(res.headers().contains_key("retry-after"));
}

#[tokio::test]
async fn test_form_encoded_create() {
    let app = common::spawn_app().await;

    let mut form = HashMap::new();
    form.insert("text", "from a form");
    let res = app
        .client
        .post(app.url("/crud-operations"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let list = app.get_json("/crud-operations").await;
    assert_eq!(list["data"][0]["text"], "from a form");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = common::test_config();
    config.security.max_body_size = 64;
    let app = common::spawn_app_with(config).await;

    let text = "x".repeat(256);
    let res = app.post_json("/crud-operations", &json!({ "text": text })).await;
    assert_eq!(res.status(), 413);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Request body too large.");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), 404);
}
