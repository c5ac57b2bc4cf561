// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::application::dto::webhook_request::{DatabaseWebhookTestRequest, WebhookStatusQuery};
use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::order::{Order, OrderItem, ShippingAddress};
use crate::domain::models::photo::{Photo, PhotoStatus};
use crate::domain::models::webhook::{iso_timestamp, EndpointHealth, WebhookEventType};
use crate::domain::services::photo_service::EDITED_VERSION_CHANGES;
use crate::domain::services::webhook_service::{AiProcessingService, DatabaseWebhookService};
use crate::presentation::errors::{ApiError, AppError};
use crate::presentation::extractors::user_id::UserId;
use axum::{
    extract::{Extension, Json, Query},
    response::IntoResponse,
};
use chrono::Utc;
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

fn tool_status(tool: &str, health: EndpointHealth) -> Value {
    let mut value = json!({ "aiTool": tool });
    if let (Value::Object(map), Ok(Value::Object(health))) =
        (&mut value, serde_json::to_value(health))
    {
        map.extend(health);
    }
    value
}

/// 查询AI工具端点状态
///
/// 指定 `aiTool` 时只检查该工具，否则并发检查全部四个工具并给出汇总
pub async fn ai_webhook_status(
    _user: UserId,
    Extension(ai): Extension<Arc<dyn AiProcessingService>>,
    Query(query): Query<WebhookStatusQuery>,
) -> impl IntoResponse {
    if let Some(raw) = query.ai_tool.filter(|t| !t.is_empty()) {
        let health = match raw.parse::<AiTool>() {
            Ok(tool) => ai.endpoint_status(tool).await,
            Err(_) => EndpointHealth::unavailable("Unsupported AI tool"),
        };
        return Json(json!({ "success": true, "data": tool_status(&raw, health) }));
    }

    let checks = AiTool::ALL.into_iter().map(|tool| {
        let ai = ai.clone();
        async move { (tool, ai.endpoint_status(tool).await) }
    });
    let results = join_all(checks).await;

    let available = results.iter().filter(|(_, h)| h.available).count();
    let statuses: Vec<Value> = results
        .into_iter()
        .map(|(tool, health)| tool_status(tool.slug(), health))
        .collect();

    Json(json!({
        "success": true,
        "data": statuses,
        "summary": {
            "total": statuses.len(),
            "available": available,
            "unavailable": statuses.len() - available,
        }
    }))
}

/// 查询数据库Webhook配置与连通性
pub async fn database_webhook_status(
    _user: UserId,
    Extension(service): Extension<Arc<dyn DatabaseWebhookService>>,
) -> impl IntoResponse {
    let configuration = service.config_status();
    let connectivity = if configuration.configured {
        Some(service.test_connectivity().await)
    } else {
        None
    };

    Json(json!({
        "success": true,
        "data": {
            "configuration": configuration,
            "connectivity": connectivity,
            "timestamp": iso_timestamp(Utc::now()),
        }
    }))
}

/// 同步发送一个测试事件
pub async fn test_database_webhook(
    user: UserId,
    Extension(service): Extension<Arc<dyn DatabaseWebhookService>>,
    Json(request): Json<DatabaseWebhookTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let raw = request
        .event_type
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Event type is required".to_string()))?;

    let event_type: WebhookEventType = raw.parse().map_err(|_| {
        ApiError::BadRequest(
            "Invalid event type. Supported: photo_created, order_created, photo_updated"
                .to_string(),
        )
    })?;

    info!("Sending test {} event for user {}", event_type, user.as_str());

    let result = match event_type {
        WebhookEventType::PhotoCreated => {
            service
                .send_photo_created(&sample_photo(user.as_str(), false), user.as_str())
                .await
        }
        WebhookEventType::PhotoUpdated => {
            service
                .send_photo_updated(
                    &sample_photo(user.as_str(), true),
                    user.as_str(),
                    &EDITED_VERSION_CHANGES,
                )
                .await
        }
        WebhookEventType::OrderCreated => {
            service
                .send_order_created(&sample_order(user.as_str()), user.as_str())
                .await
        }
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "eventType": event_type,
            "deliveryResult": result,
            "timestamp": iso_timestamp(Utc::now()),
        }
    })))
}

fn sample_photo(user_id: &str, edited: bool) -> Photo {
    let now = Utc::now();
    Photo {
        id: "test-photo-id".to_string(),
        user_id: user_id.to_string(),
        title: "Test Photo".to_string(),
        ai_tool: AiTool::VisaPhoto.slug().to_string(),
        original_url: "https://example.com/test-photo.jpg".to_string(),
        edited_url: edited.then(|| "https://example.com/test-photo-edited.jpg".to_string()),
        thumbnail_url: Some("https://example.com/test-photo-thumb.jpg".to_string()),
        editing_settings: json!({ "category": "visa", "size": "4x6" }),
        price: 25.0,
        print_size: "4x6".to_string(),
        status: if edited {
            PhotoStatus::Completed
        } else {
            PhotoStatus::Uploaded
        },
        created_at: now,
        updated_at: now,
    }
}

fn sample_order(user_id: &str) -> Order {
    let now = Utc::now();
    Order {
        id: "test-order-id".to_string(),
        user_id: user_id.to_string(),
        order_number: "ORD-TEST-123456".to_string(),
        items: vec![OrderItem {
            photo_title: "Test Photo".to_string(),
            photo_url: "https://example.com/test-photo.jpg".to_string(),
            print_size: "4x6".to_string(),
            quantity: 1,
            price: 25.0,
        }],
        total_amount: 46.25,
        shipping_address: ShippingAddress {
            full_name: "Test User".to_string(),
            address_line1: "123 Test Street".to_string(),
            address_line2: None,
            city: "Test City".to_string(),
            state: "Test State".to_string(),
            postal_code: "12345".to_string(),
            country: "Test Country".to_string(),
            phone: None,
        },
        status: "pending".to_string(),
        order_date: now,
        created_at: now,
    }
}
