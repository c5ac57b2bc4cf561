// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, fast_database_webhook, json_body, post_json, seed_photo, send,
    test_settings, TEST_USER,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_body() -> Value {
    json!({
        "title": "Family portrait",
        "aiTool": "saudi-look",
        "originalUrl": "https://cdn.example.com/family.jpg",
        "editingSettings": { "background": "white" },
        "price": 45.0,
        "printSize": "8x10"
    })
}

fn status_request(user: &str, photo_id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/photos/process?photoId={}", photo_id))
        .header("X-User-Id", user)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_store_photo_then_query_status() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        post_json("/api/photos")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(store_body().to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "Photo stored successfully");
    let photo_id = body["data"]["photoId"].as_str().unwrap().to_string();

    let response = send(&app.router, status_request(TEST_USER, &photo_id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["photoId"], photo_id.as_str());
    assert_eq!(body["data"]["status"], "uploaded");
    assert_eq!(body["data"]["originalUrl"], "https://cdn.example.com/family.jpg");
    assert!(body["data"]["editedUrl"].is_null());
}

#[tokio::test]
async fn test_store_photo_emits_photo_created_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-Event-Type", "photo_created"))
        .and(body_partial_json(json!({
            "event": "photo_created",
            "userId": TEST_USER,
            "data": { "aiTool": "saudi-look", "status": "uploaded" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = test_settings();
    settings.webhooks.database = fast_database_webhook(Some(server.uri()));
    let app = create_test_app(settings).await;

    let response = send(
        &app.router,
        post_json("/api/photos")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(store_body().to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    for _ in 0..50 {
        if !server.received_requests().await.unwrap_or_default().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    server.verify().await;
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        post_json("/api/photos")
            .body(Body::from(store_body().to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_store_photo_rejects_invalid_input() {
    let app = create_test_app(test_settings()).await;

    let mut unknown_tool = store_body();
    unknown_tool["aiTool"] = json!("passport-magic");
    let response = send(
        &app.router,
        post_json("/api/photos")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(unknown_tool.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid AI tool");

    let mut bad_status = store_body();
    bad_status["status"] = json!("shipped");
    let response = send(
        &app.router,
        post_json("/api/photos")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(bad_status.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid status");

    let mut no_title = store_body();
    no_title["title"] = json!("");
    let response = send(
        &app.router,
        post_json("/api/photos")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(no_title.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_requires_all_fields() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        post_json("/api/photos/process")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(json!({ "photoId": "p1" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Missing required fields");
}

#[tokio::test]
async fn test_other_users_photo_is_not_found() {
    let app = create_test_app(test_settings()).await;
    let photo = seed_photo(&app.photos, "someone-else").await;

    let response = send(
        &app.router,
        post_json("/api/photos/process")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(
                json!({
                    "photoId": photo.id,
                    "imageUrl": photo.original_url,
                    "aiTool": "visa-photo"
                })
                .to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Photo not found");

    let response = send(&app.router, status_request(TEST_USER, &photo.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_requires_photo_id() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        Request::builder()
            .uri("/api/photos/process")
            .header("X-User-Id", TEST_USER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Photo ID required");
}

#[tokio::test]
async fn test_database_webhook_test_endpoint_validates_event_type() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        post_json("/api/webhooks/database/test")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(json!({ "eventType": "photo_deleted" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Invalid event type. Supported: photo_created, order_created, photo_updated"
    );

    let response = send(
        &app.router,
        post_json("/api/webhooks/database/test")
            .header("X-User-Id", TEST_USER)
            .body(Body::from("{}"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Event type is required");
}

#[tokio::test]
async fn test_database_webhook_test_endpoint_reports_unconfigured_url() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        post_json("/api/webhooks/database/test")
            .header("X-User-Id", TEST_USER)
            .body(Body::from(json!({ "eventType": "order_created" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["eventType"], "order_created");
    assert_eq!(body["data"]["deliveryResult"]["success"], false);
    assert_eq!(
        body["data"]["deliveryResult"]["error"],
        "Webhook URL not configured"
    );
}

#[tokio::test]
async fn test_database_webhook_status_without_url() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        Request::builder()
            .uri("/api/webhooks/database/status")
            .header("X-User-Id", TEST_USER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["configuration"]["configured"], false);
    assert_eq!(body["data"]["configuration"]["hasAuth"], false);
    assert!(body["data"]["connectivity"].is_null());
}
