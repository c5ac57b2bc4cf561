// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::webhook::iso_timestamp;
use crate::domain::services::callback_service::CallbackService;
use crate::domain::services::photo_service::PhotoService;
use crate::domain::services::webhook_service::{AiProcessingService, DatabaseWebhookService};
use crate::presentation::handlers::{callback_handler, photo_handler, webhook_status_handler};
use crate::presentation::middleware::rate_limit_middleware::{
    rate_limit_middleware, RateLimiter,
};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由依赖的服务集合
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub photos: Arc<PhotoService>,
    pub callbacks: Arc<CallbackService>,
    pub database_webhook: Arc<dyn DatabaseWebhookService>,
    pub ai_processing: Arc<dyn AiProcessingService>,
    pub rate_limiter: Arc<RateLimiter>,
}

/// 创建应用路由
///
/// # 参数
///
/// * `state` - 路由依赖的服务
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    // Static segments take priority over `{tool}`.
    let mut api_routes = Router::new()
        .route(
            "/api/webhooks/status",
            get(webhook_status_handler::ai_webhook_status),
        )
        .route(
            "/api/webhooks/database/status",
            get(webhook_status_handler::database_webhook_status),
        )
        .route(
            "/api/webhooks/database/test",
            post(webhook_status_handler::test_database_webhook),
        )
        .route(
            "/api/webhooks/{tool}",
            post(callback_handler::receive_callback).get(callback_handler::callback_health),
        )
        .route("/api/photos", post(photo_handler::store_photo))
        .route(
            "/api/photos/process",
            post(photo_handler::process_photo).get(photo_handler::processing_status),
        );

    if state.settings.rate_limiting.enabled {
        api_routes = api_routes.layer(axum::middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));
    }

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(Extension(state.settings))
        .layer(Extension(state.photos))
        .layer(Extension(state.callbacks))
        .layer(Extension(state.database_webhook))
        .layer(Extension(state.ai_processing))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回服务名、状态和时间戳
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "healthy",
        "timestamp": iso_timestamp(Utc::now()),
    }))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
