// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_test_app, json_body, post_json, seed_photo, send, test_settings, TEST_USER,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use photoprint::config::settings::Settings;
use photoprint::domain::models::ai_tool::AiTool;
use photoprint::domain::models::photo::PhotoStatus;
use photoprint::domain::services::webhook_service::AiProcessingService;
use photoprint::infrastructure::services::ai_processing_service_impl::{
    AiProcessingServiceImpl, AI_PROCESSING_USER_AGENT,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = test_settings();
    settings.webhooks.ai_tools.visa_photo.url = Some(format!("{}/process", server.uri()));
    settings.webhooks.ai_tools.visa_photo.auth_token = Some("visa-token".to_string());
    settings
}

fn process_request(photo_id: &str) -> Request<Body> {
    post_json("/api/photos/process")
        .header("X-User-Id", TEST_USER)
        .body(Body::from(
            json!({
                "photoId": photo_id,
                "imageUrl": "https://cdn.example.com/original.jpg",
                "aiTool": "visa-photo"
            })
            .to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_synchronous_result_completes_photo() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .and(header("Authorization", "Bearer visa-token"))
        .and(header("User-Agent", AI_PROCESSING_USER_AGENT))
        .and(body_partial_json(json!({
            "tool": "visa-photo",
            "userId": TEST_USER,
            "imageUrl": "https://cdn.example.com/original.jpg",
            "callbackUrl": "http://photoprint.test/api/webhooks/visa-photo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processedImageUrl": "https://ai.example.com/out.jpg",
            "jobId": "job-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(settings_for(&server)).await;
    let photo = seed_photo(&app.photos, TEST_USER).await;

    let response = send(&app.router, process_request(&photo.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["message"], "Photo processing started successfully");
    assert_eq!(body["data"]["jobId"], "job-42");
    assert_eq!(
        body["data"]["processedImageUrl"],
        "https://ai.example.com/out.jpg"
    );

    let stored = app.photos.get_photo(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PhotoStatus::Completed);
    assert_eq!(
        stored.edited_url.as_deref(),
        Some("https://ai.example.com/out.jpg")
    );
}

#[tokio::test]
async fn test_reply_without_result_marks_photo_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "jobId": "job-7" })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(settings_for(&server)).await;
    let photo = seed_photo(&app.photos, TEST_USER).await;

    let response = send(&app.router, process_request(&photo.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "failed");
    assert_eq!(body["data"]["jobId"], "job-7");
    assert!(body["data"]["processedImageUrl"].is_null());

    let stored = app.photos.get_photo(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PhotoStatus::Failed);
    assert!(stored.edited_url.is_none());
}

#[tokio::test]
async fn test_exhausted_retries_mark_photo_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let app = create_test_app(settings_for(&server)).await;
    let photo = seed_photo(&app.photos, TEST_USER).await;

    let response = send(&app.router, process_request(&photo.id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "HTTP 500: Internal Server Error");

    let stored = app.photos.get_photo(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PhotoStatus::Failed);
}

#[tokio::test]
async fn test_plain_text_reply_marks_photo_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
        .mount(&server)
        .await;

    let app = create_test_app(settings_for(&server)).await;
    let photo = seed_photo(&app.photos, TEST_USER).await;
    let service = AiProcessingServiceImpl::new(app.settings.webhooks.clone(), app.photos.clone())
        .unwrap();

    let result = service
        .process_photo(photoprint::domain::models::webhook::AiProcessingRequest {
            photo_id: photo.id.clone(),
            image_url: photo.original_url.clone(),
            ai_tool: AiTool::VisaPhoto,
            user_id: TEST_USER.to_string(),
            callback_url: Some("https://elsewhere.test/hook".to_string()),
        })
        .await;

    assert!(result.success);
    assert!(result.processed_image_url.is_none());
    assert_eq!(result.photo_status, PhotoStatus::Failed);
    let stored = app.photos.get_photo(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PhotoStatus::Failed);
}

#[tokio::test]
async fn test_endpoint_url_falls_back_to_default() {
    let app = create_test_app(test_settings()).await;
    let service = AiProcessingServiceImpl::new(app.settings.webhooks.clone(), app.photos.clone())
        .unwrap();

    assert_eq!(
        service.endpoint_url(AiTool::BabyPhoto),
        "https://api.example.com/baby-photo/process"
    );
}

#[tokio::test]
async fn test_status_endpoint_reports_configured_tool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/process/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(settings_for(&server)).await;

    let response = send(
        &app.router,
        Request::builder()
            .uri("/api/webhooks/status?aiTool=visa-photo")
            .header("X-User-Id", TEST_USER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["aiTool"], "visa-photo");
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
async fn test_status_endpoint_rejects_unknown_tool_gracefully() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        Request::builder()
            .uri("/api/webhooks/status?aiTool=passport")
            .header("X-User-Id", TEST_USER)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["error"], "Unsupported AI tool");
}

/// Answers every request with a 200 whose body is cut short.
async fn start_truncating_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    let n = match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    request.extend_from_slice(&buf[..n]);
                    if request_complete(&request) {
                        break;
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                          Content-Length: 200\r\nConnection: close\r\n\r\n\
                          {\"processedImageUrl\": \"https://ai.exa",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), hits)
}

fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= end + 4 + length
}

#[tokio::test]
async fn test_truncated_reply_is_a_failed_delivery() {
    let (base, hits) = start_truncating_server().await;
    let mut settings = test_settings();
    settings.webhooks.ai_tools.visa_photo.url = Some(format!("{}/process", base));
    let app = create_test_app(settings).await;
    let photo = seed_photo(&app.photos, TEST_USER).await;

    let response = send(&app.router, process_request(&photo.id)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid response body"));
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    let stored = app.photos.get_photo(&photo.id).await.unwrap().unwrap();
    assert_eq!(stored.status, PhotoStatus::Failed);
    assert!(stored.edited_url.is_none());
}
