// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, json_body, send, test_settings};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["service"], "photoprint");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_version() {
    let app = create_test_app(test_settings()).await;

    let response = send(
        &app.router,
        Request::builder()
            .uri("/v1/version")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], env!("CARGO_PKG_VERSION").as_bytes());
}
