// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, json_body, send, test_settings};
use axum::body::Body;
use axum::http::{Request, StatusCode};

fn health_probe(user: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/webhooks/visa-photo")
        .header("X-User-Id", user)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_requests_over_limit_are_rejected() {
    let mut settings = test_settings();
    settings.rate_limiting.max_requests = 2;
    let app = create_test_app(settings).await;

    for _ in 0..2 {
        let response = send(&app.router, health_probe("alice")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app.router, health_probe("alice")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let headers = response.headers();
    assert_eq!(headers["X-RateLimit-Limit"], "2");
    assert_eq!(headers["X-RateLimit-Remaining"], "0");
    let retry_after: u64 = headers["Retry-After"].to_str().unwrap().parse().unwrap();
    assert!(retry_after >= 1 && retry_after <= 60);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Rate limit exceeded");
    assert_eq!(body["retryAfter"], retry_after);
}

#[tokio::test]
async fn test_clients_and_actions_are_counted_separately() {
    let mut settings = test_settings();
    settings.rate_limiting.max_requests = 1;
    let app = create_test_app(settings).await;

    assert_eq!(
        send(&app.router, health_probe("alice")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        send(&app.router, health_probe("alice")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        send(&app.router, health_probe("bob")).await.status(),
        StatusCode::OK
    );

    // Same client, different path.
    let response = send(
        &app.router,
        Request::builder()
            .uri("/api/webhooks/absher")
            .header("X-User-Id", "alice")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_routes_are_not_limited() {
    let mut settings = test_settings();
    settings.rate_limiting.max_requests = 1;
    let app = create_test_app(settings).await;

    for _ in 0..3 {
        let response = send(
            &app.router,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_disabled_limiter_lets_everything_through() {
    let mut settings = test_settings();
    settings.rate_limiting.enabled = false;
    settings.rate_limiting.max_requests = 1;
    let app = create_test_app(settings).await;

    for _ in 0..3 {
        assert_eq!(
            send(&app.router, health_probe("alice")).await.status(),
            StatusCode::OK
        );
    }
}
