// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// AI端点状态查询
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookStatusQuery {
    pub ai_tool: Option<String>,
}

/// 数据库Webhook测试请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseWebhookTestRequest {
    pub event_type: Option<String>,
}
