// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{non_empty, DatabaseWebhookSettings};
use crate::domain::models::webhook::{
    DeliveryResult, EndpointHealth, WebhookConfigStatus, WebhookPayload,
};
use crate::domain::services::webhook_service::DatabaseWebhookService;
use crate::infrastructure::services::webhook_client::WebhookClient;
use crate::utils::errors::DeliveryError;
use crate::utils::url_utils::mask_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{info, warn};

/// 数据库Webhook请求的 User-Agent
pub const DATABASE_WEBHOOK_USER_AGENT: &str = "PhotoApp-DatabaseWebhook/1.0";

/// 数据库事件Webhook服务实现
pub struct DatabaseWebhookServiceImpl {
    url: Option<String>,
    auth_token: Option<String>,
    client: WebhookClient,
}

impl DatabaseWebhookServiceImpl {
    /// 根据配置创建服务
    ///
    /// HTTP客户端无法初始化时返回错误
    pub fn new(settings: &DatabaseWebhookSettings) -> Result<Self, DeliveryError> {
        Ok(Self {
            url: non_empty(settings.url.as_deref()).map(str::to_string),
            auth_token: non_empty(settings.auth_token.as_deref()).map(str::to_string),
            client: WebhookClient::new(
                "database",
                DATABASE_WEBHOOK_USER_AGENT,
                settings.retry_policy(),
                settings.timeout(),
            )?,
        })
    }

    fn event_headers(payload: &WebhookPayload) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-Event-Type", HeaderValue::from_static(payload.event.as_str()));
        if let Ok(value) = HeaderValue::from_str(&payload.timestamp) {
            headers.insert("X-Timestamp", value);
        }
        headers
    }
}

#[async_trait]
impl DatabaseWebhookService for DatabaseWebhookServiceImpl {
    async fn deliver(&self, payload: &WebhookPayload) -> DeliveryResult {
        let Some(url) = self.url.as_deref() else {
            warn!(
                "Database webhook URL not configured, skipping {} event",
                payload.event
            );
            return DeliveryResult::failed(DeliveryError::NotConfigured.to_string());
        };

        let result = self
            .client
            .post_json(
                url,
                payload,
                Self::event_headers(payload),
                self.auth_token.as_deref(),
            )
            .await;

        match result {
            Ok(delivered) => {
                let delivery_time = delivered.elapsed.as_millis() as u64;
                info!(
                    event = %payload.event,
                    user_id = %payload.user_id,
                    status = delivered.status,
                    attempts = delivered.attempts,
                    delivery_time_ms = delivery_time,
                    "Database webhook delivered"
                );
                DeliveryResult::delivered(delivered.status, delivery_time)
            }
            Err(err) => DeliveryResult::failed(err.to_string()),
        }
    }

    async fn test_connectivity(&self) -> EndpointHealth {
        match self.url.as_deref() {
            Some(url) => self.client.probe(url).await,
            None => EndpointHealth::unavailable(DeliveryError::NotConfigured.to_string()),
        }
    }

    fn config_status(&self) -> WebhookConfigStatus {
        WebhookConfigStatus {
            configured: self.url.is_some(),
            url: self.url.as_deref().map(mask_url),
            has_auth: self.auth_token.is_some(),
        }
    }
}
