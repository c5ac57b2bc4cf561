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

use crate::config::settings::Settings;
use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::webhook::{iso_timestamp, CallbackPayload};
use crate::domain::services::callback_service::CallbackService;
use crate::utils::errors::CallbackError;
use axum::{
    body::to_bytes,
    extract::{Extension, Path, Request},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// 回调请求体上限
const MAX_CALLBACK_BODY: usize = 1024 * 1024;

const PROCESSING_FAILED: &str = "Webhook processing failed";

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn parse_tool(raw: &str) -> Result<AiTool, Response> {
    raw.parse::<AiTool>()
        .map_err(|e| error_response(StatusCode::NOT_FOUND, &e.to_string()))
}

/// 校验合作方的 Bearer 令牌
///
/// 去掉第一个 `"Bearer "` 后与配置的令牌比较，未配置令牌时不做校验
pub fn is_authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.replacen("Bearer ", "", 1) == expected)
        .unwrap_or(false)
}

/// 接收AI合作方的处理结果回调
///
/// 认证在读取请求体之前完成
pub async fn receive_callback(
    Path(tool): Path<String>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(callbacks): Extension<Arc<CallbackService>>,
    request: Request,
) -> Response {
    let tool = match parse_tool(&tool) {
        Ok(tool) => tool,
        Err(response) => return response,
    };

    let token = settings.webhooks.ai_tools.auth_token(tool);
    if !is_authorized(request.headers(), token) {
        warn!("Rejected {} callback with invalid credentials", tool);
        counter!("webhook_callbacks_total", "tool" => tool.slug(), "outcome" => "unauthorized")
            .increment(1);
        return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let payload = match read_payload(request).await {
        Ok(payload) => payload,
        Err(e) => {
            error!("{} webhook processing error: {}", tool, e);
            counter!("webhook_callbacks_total", "tool" => tool.slug(), "outcome" => "invalid")
                .increment(1);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
        }
    };

    match callbacks.handle(tool, &payload).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": outcome.action.message() })),
        )
            .into_response(),
        Err(err @ CallbackError::MissingPhotoId) => {
            warn!("{} callback without photo ID", tool);
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            error!("{} webhook processing error: {}", tool, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
        }
    }
}

async fn read_payload(request: Request) -> anyhow::Result<CallbackPayload> {
    let bytes = to_bytes(request.into_body(), MAX_CALLBACK_BODY).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// 回调端点健康检查
pub async fn callback_health(Path(tool): Path<String>) -> Response {
    match parse_tool(&tool) {
        Ok(tool) => Json(json!({
            "service": tool.service_name(),
            "status": "healthy",
            "timestamp": iso_timestamp(Utc::now()),
        }))
        .into_response(),
        Err(response) => response,
    }
}
