// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{non_empty, WebhookSettings};
use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::photo::PhotoStatus;
use crate::domain::models::webhook::{
    iso_timestamp, AiProcessingBody, AiProcessingReply, AiProcessingRequest,
    AiProcessingResponse, EndpointHealth,
};
use crate::domain::services::photo_service::PhotoService;
use crate::domain::services::webhook_service::AiProcessingService;
use crate::infrastructure::services::webhook_client::WebhookClient;
use crate::utils::errors::DeliveryError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// AI处理请求的 User-Agent
pub const AI_PROCESSING_USER_AGENT: &str = "PhotoApp/1.0";

/// AI处理服务实现
///
/// 将照片发送给对应的AI工具。工具同步返回处理结果时写入编辑版本，
/// 应答中没有结果图片时照片标记为 `failed`。
pub struct AiProcessingServiceImpl {
    settings: WebhookSettings,
    photos: Arc<PhotoService>,
    client: WebhookClient,
}

impl AiProcessingServiceImpl {
    /// 创建新的AI处理服务
    ///
    /// # 参数
    ///
    /// * `settings` - Webhook配置（AI端点、令牌、重试参数）
    /// * `photos` - 照片服务
    pub fn new(
        settings: WebhookSettings,
        photos: Arc<PhotoService>,
    ) -> Result<Self, DeliveryError> {
        let client = WebhookClient::new(
            "ai",
            AI_PROCESSING_USER_AGENT,
            settings.ai_retry_policy(),
            settings.ai_timeout(),
        )?;

        Ok(Self {
            settings,
            photos,
            client,
        })
    }

    /// 工具的处理端点，未配置时使用默认地址
    pub fn endpoint_url(&self, tool: AiTool) -> String {
        non_empty(self.settings.ai_tools.endpoint(tool).url.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| tool.default_endpoint())
    }

    fn parse_reply(body: &str) -> AiProcessingReply {
        if body.trim().is_empty() {
            return AiProcessingReply::default();
        }
        serde_json::from_str(body).unwrap_or_else(|e| {
            warn!("AI tool returned a non-JSON body: {}", e);
            AiProcessingReply::default()
        })
    }
}

#[async_trait]
impl AiProcessingService for AiProcessingServiceImpl {
    async fn process_photo(&self, request: AiProcessingRequest) -> AiProcessingResponse {
        let tool = request.ai_tool;

        if let Err(e) = self
            .photos
            .update_status(&request.photo_id, PhotoStatus::Processing)
            .await
        {
            error!("Failed to mark photo {} as processing: {}", request.photo_id, e);
            return AiProcessingResponse::failed(e.to_string());
        }

        let callback_url = request
            .callback_url
            .clone()
            .unwrap_or_else(|| self.settings.callback_url(tool));
        let body = AiProcessingBody {
            image_url: &request.image_url,
            tool,
            user_id: &request.user_id,
            photo_id: &request.photo_id,
            callback_url: Some(&callback_url),
            timestamp: iso_timestamp(Utc::now()),
        };

        let result = self
            .client
            .post_json(
                &self.endpoint_url(tool),
                &body,
                HeaderMap::new(),
                self.settings.ai_tools.auth_token(tool),
            )
            .await;

        let delivered = match result {
            Ok(delivered) => delivered,
            Err(err) => {
                if let Err(e) = self
                    .photos
                    .update_status(&request.photo_id, PhotoStatus::Failed)
                    .await
                {
                    error!("Failed to mark photo {} as failed: {}", request.photo_id, e);
                }
                return AiProcessingResponse::failed(err.to_string());
            }
        };

        let reply = Self::parse_reply(&delivered.body);
        let processed_image_url = reply.result_url().map(str::to_string);

        let photo_status = match processed_image_url.as_deref() {
            Some(url) => {
                if let Err(e) = self
                    .photos
                    .update_with_edited_version(&request.photo_id, url)
                    .await
                {
                    error!(
                        "Failed to store edited version for photo {}: {}",
                        request.photo_id, e
                    );
                    return AiProcessingResponse::failed(e.to_string());
                }
                info!(
                    "Photo {} processed synchronously by {}",
                    request.photo_id, tool
                );
                PhotoStatus::Completed
            }
            None => {
                // A reply without an edited image counts as a failed run.
                warn!(
                    "{} returned no processed image for photo {}",
                    tool, request.photo_id
                );
                if let Err(e) = self
                    .photos
                    .update_status(&request.photo_id, PhotoStatus::Failed)
                    .await
                {
                    error!("Failed to mark photo {} as failed: {}", request.photo_id, e);
                    return AiProcessingResponse::failed(e.to_string());
                }
                PhotoStatus::Failed
            }
        };

        AiProcessingResponse {
            success: true,
            processed_image_url,
            error: None,
            processing_time: reply.processing_time,
            job_id: reply.job_id,
            photo_status,
        }
    }

    async fn endpoint_status(&self, tool: AiTool) -> EndpointHealth {
        self.client.probe(&self.endpoint_url(tool)).await
    }
}
