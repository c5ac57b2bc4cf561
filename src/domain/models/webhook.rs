// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ai_tool::AiTool;
use super::order::{Order, OrderItem, ShippingAddress};
use super::photo::{Photo, PhotoStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 出站事件类型
///
/// 数据库Webhook支持的三种状态变化通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// 照片创建
    PhotoCreated,
    /// 照片更新
    PhotoUpdated,
    /// 订单创建
    OrderCreated,
}

impl WebhookEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::PhotoCreated => "photo_created",
            WebhookEventType::PhotoUpdated => "photo_updated",
            WebhookEventType::OrderCreated => "order_created",
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo_created" => Ok(WebhookEventType::PhotoCreated),
            "photo_updated" => Ok(WebhookEventType::PhotoUpdated),
            "order_created" => Ok(WebhookEventType::OrderCreated),
            other => Err(format!("Invalid event type: {}", other)),
        }
    }
}

/// 照片创建事件数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCreatedData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub ai_tool: String,
    pub original_url: String,
    pub edited_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub editing_settings: serde_json::Value,
    pub price: f64,
    pub print_size: String,
    pub status: PhotoStatus,
    pub created_at: DateTime<Utc>,
}

/// 照片更新事件数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdatedData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub ai_tool: String,
    pub original_url: String,
    pub edited_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub editing_settings: serde_json::Value,
    pub price: f64,
    pub print_size: String,
    pub status: PhotoStatus,
    pub updated_at: DateTime<Utc>,
    pub changes: Vec<String>,
}

/// 订单创建事件数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedData {
    pub id: String,
    pub user_id: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 事件数据
///
/// 序列化时不带标签，事件类型由信封中的 `event` 字段给出。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventData {
    PhotoCreated(PhotoCreatedData),
    PhotoUpdated(PhotoUpdatedData),
    OrderCreated(OrderCreatedData),
}

impl EventData {
    pub fn event_type(&self) -> WebhookEventType {
        match self {
            EventData::PhotoCreated(_) => WebhookEventType::PhotoCreated,
            EventData::PhotoUpdated(_) => WebhookEventType::PhotoUpdated,
            EventData::OrderCreated(_) => WebhookEventType::OrderCreated,
        }
    }
}

/// 出站Webhook信封
///
/// `{event, data, timestamp, userId}`，在业务写入完成时构建，投递结束后丢弃。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// 事件类型
    pub event: WebhookEventType,
    /// 记录快照
    pub data: EventData,
    /// ISO-8601 时间戳（毫秒精度）
    pub timestamp: String,
    /// 触发事件的用户ID
    pub user_id: String,
}

impl WebhookPayload {
    /// 使用当前时间构建信封
    pub fn new(data: EventData, user_id: impl Into<String>) -> Self {
        Self {
            event: data.event_type(),
            data,
            timestamp: iso_timestamp(Utc::now()),
            user_id: user_id.into(),
        }
    }

    /// 构建 `photo_created` 事件
    pub fn photo_created(photo: &Photo, user_id: impl Into<String>) -> Self {
        Self::new(
            EventData::PhotoCreated(PhotoCreatedData {
                id: photo.id.clone(),
                user_id: photo.user_id.clone(),
                title: photo.title.clone(),
                ai_tool: photo.ai_tool.clone(),
                original_url: photo.original_url.clone(),
                edited_url: photo.edited_url.clone(),
                thumbnail_url: photo.thumbnail_url.clone(),
                editing_settings: photo.editing_settings.clone(),
                price: photo.price,
                print_size: photo.print_size.clone(),
                status: photo.status.clone(),
                created_at: photo.created_at,
            }),
            user_id,
        )
    }

    /// 构建 `photo_updated` 事件
    pub fn photo_updated(photo: &Photo, user_id: impl Into<String>, changes: &[&str]) -> Self {
        Self::new(
            EventData::PhotoUpdated(PhotoUpdatedData {
                id: photo.id.clone(),
                user_id: photo.user_id.clone(),
                title: photo.title.clone(),
                ai_tool: photo.ai_tool.clone(),
                original_url: photo.original_url.clone(),
                edited_url: photo.edited_url.clone(),
                thumbnail_url: photo.thumbnail_url.clone(),
                editing_settings: photo.editing_settings.clone(),
                price: photo.price,
                print_size: photo.print_size.clone(),
                status: photo.status.clone(),
                updated_at: photo.updated_at,
                changes: changes.iter().map(|c| c.to_string()).collect(),
            }),
            user_id,
        )
    }

    /// 构建 `order_created` 事件
    pub fn order_created(order: &Order, user_id: impl Into<String>) -> Self {
        Self::new(
            EventData::OrderCreated(OrderCreatedData {
                id: order.id.clone(),
                user_id: order.user_id.clone(),
                order_number: order.order_number.clone(),
                items: order.items.clone(),
                total_amount: order.total_amount,
                shipping_address: order.shipping_address.clone(),
                status: order.status.clone(),
                order_date: order.order_date,
                created_at: order.created_at,
            }),
            user_id,
        )
    }
}

/// 格式化为 `2025-01-01T12:00:00.000Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 单次投递结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 成功那次请求的耗时（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<u64>,
}

impl DeliveryResult {
    pub fn delivered(status_code: u16, delivery_time: u64) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            error: None,
            delivery_time: Some(delivery_time),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: None,
            error: Some(error.into()),
            delivery_time: None,
        }
    }
}

/// 端点可用性检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndpointHealth {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            response_time: None,
            error: Some(error.into()),
        }
    }
}

/// 数据库Webhook配置概览（URL已脱敏）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfigStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub has_auth: bool,
}

/// 合作方回调负载
///
/// `{photoId, processedImageUrl?, editedUrl?, status?, error?}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    #[serde(default)]
    pub photo_id: Option<String>,
    #[serde(default)]
    pub processed_image_url: Option<String>,
    #[serde(default)]
    pub edited_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// 合作方可能发送字符串或对象
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl CallbackPayload {
    /// 非空的照片ID
    pub fn photo_id(&self) -> Option<&str> {
        non_blank(self.photo_id.as_deref())
    }

    /// 处理后的图片地址，优先 `processedImageUrl`
    pub fn result_url(&self) -> Option<&str> {
        non_blank(self.processed_image_url.as_deref())
            .or_else(|| non_blank(self.edited_url.as_deref()))
    }

    /// 非空的状态
    pub fn status(&self) -> Option<&str> {
        non_blank(self.status.as_deref())
    }

    /// 是否携带了有效的错误信息
    pub fn has_error(&self) -> bool {
        match &self.error {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 回调处理后的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// 标记完成并写入处理后的地址
    Complete { edited_url: String },
    /// 标记失败
    Fail,
    /// 原样写入合作方上报的状态
    SetStatus(PhotoStatus),
    /// 没有可更新的内容
    Nothing,
}

impl CallbackAction {
    /// 根据回调负载决定要执行的更新
    pub fn decide(payload: &CallbackPayload) -> Self {
        let status = payload.status();

        if let (Some("completed"), Some(url)) = (status, payload.result_url()) {
            return CallbackAction::Complete {
                edited_url: url.to_string(),
            };
        }

        if status == Some("failed") || payload.has_error() {
            return CallbackAction::Fail;
        }

        match status {
            Some(s) => CallbackAction::SetStatus(PhotoStatus::from(s)),
            None => CallbackAction::Nothing,
        }
    }

    /// 返回给合作方的消息
    pub fn message(&self) -> &'static str {
        match self {
            CallbackAction::Complete { .. } => "Photo processing completed successfully",
            CallbackAction::Fail => "Photo processing failed, status updated",
            CallbackAction::SetStatus(_) | CallbackAction::Nothing => "Photo status updated",
        }
    }

    /// 指标标签
    pub fn outcome(&self) -> &'static str {
        match self {
            CallbackAction::Complete { .. } => "completed",
            CallbackAction::Fail => "failed",
            CallbackAction::SetStatus(_) => "status",
            CallbackAction::Nothing => "noop",
        }
    }
}

/// 回调处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub tool: AiTool,
    pub photo_id: String,
    pub action: CallbackAction,
    /// 照片记录是否存在并已更新
    pub photo_found: bool,
}

/// 发往AI工具的处理请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiProcessingRequest {
    pub photo_id: String,
    pub image_url: String,
    pub ai_tool: AiTool,
    pub user_id: String,
    pub callback_url: Option<String>,
}

/// AI处理请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProcessingBody<'a> {
    pub image_url: &'a str,
    pub tool: AiTool,
    pub user_id: &'a str,
    pub photo_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
    pub timestamp: String,
}

/// AI工具的同步应答
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProcessingReply {
    #[serde(default)]
    pub processed_image_url: Option<String>,
    #[serde(default)]
    pub edited_url: Option<String>,
    #[serde(default)]
    pub processing_time: Option<serde_json::Value>,
    #[serde(default)]
    pub job_id: Option<String>,
}

impl AiProcessingReply {
    pub fn result_url(&self) -> Option<&str> {
        non_blank(self.processed_image_url.as_deref())
            .or_else(|| non_blank(self.edited_url.as_deref()))
    }
}

/// AI处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProcessingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// 处理结束后照片所处的状态
    #[serde(rename = "status")]
    pub photo_status: PhotoStatus,
}

impl AiProcessingResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            processed_image_url: None,
            error: Some(error.into()),
            processing_time: None,
            job_id: None,
            photo_status: PhotoStatus::Failed,
        }
    }
}
