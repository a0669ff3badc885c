//! Webhook router driven in-process, inspecting queued notifications

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use boredbot::notify;
use boredbot::webhooks::{router, WebhookState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhooks/new_post")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_page_create_queues_announcement() {
    let resources = common::resources();
    let (tx, mut rx) = notify::channel();
    let app = router(WebhookState::new(resources.clone(), tx, 1234));

    let resp = app
        .oneshot(post(json!({
            "event": "page_create",
            "url": "https://wiki.example/page/1",
            "triggered_by": {"name": "Sasha"}
        })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Webhook received");

    let notification = rx.recv().await.expect("no notification queued");
    assert_eq!(notification.channel_id, 1234);
    assert!(notification
        .content
        .ends_with(" It's author is **Sasha**!\nhttps://wiki.example/page/1"));
}

#[tokio::test]
async fn test_page_create_without_url_has_no_link_line() {
    let (tx, mut rx) = notify::channel();
    let app = router(WebhookState::new(common::resources(), tx, 5));

    let resp = app
        .oneshot(post(json!({
            "event": "page_create",
            "triggered_by": {"name": "Yarna"}
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let notification = rx.recv().await.expect("no notification queued");
    assert!(notification.content.ends_with(" It's author is **Yarna**!"));
    assert!(!notification.content.contains('\n'));
}

#[tokio::test]
async fn test_other_events_queue_nothing() {
    let (tx, mut rx) = notify::channel();
    let app = router(WebhookState::new(common::resources(), tx, 1));

    let resp = app
        .oneshot(post(json!({"event": "page_update", "url": "https://wiki.example/page/1"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    // The router (and its sender) is gone after oneshot
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_page_create_without_author() {
    let (tx, _rx) = notify::channel();
    let app = router(WebhookState::new(common::resources(), tx, 1));

    let resp = app
        .oneshot(post(json!({"event": "page_create"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_relay_gone() {
    let (tx, rx) = notify::channel();
    drop(rx);
    let app = router(WebhookState::new(common::resources(), tx, 1));

    let health = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = app
        .oneshot(post(json!({
            "event": "page_create",
            "triggered_by": {"name": "Sasha"}
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}
