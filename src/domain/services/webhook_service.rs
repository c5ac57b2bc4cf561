// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::order::Order;
use crate::domain::models::photo::Photo;
use crate::domain::models::webhook::{
    AiProcessingRequest, AiProcessingResponse, DeliveryResult, EndpointHealth,
    WebhookConfigStatus, WebhookPayload,
};
use async_trait::async_trait;

/// 数据库事件Webhook服务特质
///
/// 定义出站事件投递的核心逻辑。投递失败不会以 `Err` 形式返回，
/// 而是体现在 [`DeliveryResult`] 中。
#[async_trait]
pub trait DatabaseWebhookService: Send + Sync {
    /// 投递一个已构建好的事件信封（带重试）
    async fn deliver(&self, payload: &WebhookPayload) -> DeliveryResult;

    /// 检查目标端点的连通性
    async fn test_connectivity(&self) -> EndpointHealth;

    /// 返回配置概览
    fn config_status(&self) -> WebhookConfigStatus;

    /// 发送 `photo_created` 事件
    async fn send_photo_created(&self, photo: &Photo, user_id: &str) -> DeliveryResult {
        self.deliver(&WebhookPayload::photo_created(photo, user_id))
            .await
    }

    /// 发送 `photo_updated` 事件
    async fn send_photo_updated(
        &self,
        photo: &Photo,
        user_id: &str,
        changes: &[&str],
    ) -> DeliveryResult {
        self.deliver(&WebhookPayload::photo_updated(photo, user_id, changes))
            .await
    }

    /// 发送 `order_created` 事件
    async fn send_order_created(&self, order: &Order, user_id: &str) -> DeliveryResult {
        self.deliver(&WebhookPayload::order_created(order, user_id))
            .await
    }
}

/// 事件发布特质
///
/// 发布后立即返回，投递在后台进行，结果只记录日志。
pub trait EventPublisher: Send + Sync {
    fn publish(&self, payload: WebhookPayload);
}

/// AI处理服务特质
#[async_trait]
pub trait AiProcessingService: Send + Sync {
    /// 将照片发送给AI工具处理
    async fn process_photo(&self, request: AiProcessingRequest) -> AiProcessingResponse;

    /// 检查AI工具端点的可用性
    async fn endpoint_status(&self, tool: AiTool) -> EndpointHealth;
}
