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

use crate::application::dto::photo_request::{
    ProcessPhotoRequestDto, ProcessStatusQuery, StorePhotoRequestDto, STORABLE_STATUSES,
};
use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::photo::PhotoStatus;
use crate::domain::models::webhook::AiProcessingRequest;
use crate::domain::services::photo_service::PhotoService;
use crate::domain::services::webhook_service::AiProcessingService;
use crate::presentation::errors::{ApiError, AppError};
use crate::presentation::extractors::user_id::UserId;
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

fn parse_tool(raw: &str) -> Result<AiTool, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid AI tool".to_string()))
}

/// 保存上传完成的照片记录
///
/// 写入成功后在后台发送 `photo_created` 事件
pub async fn store_photo(
    user: UserId,
    Extension(photos): Extension<Arc<PhotoService>>,
    Json(payload): Json<StorePhotoRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let tool = parse_tool(&payload.ai_tool)?;

    let status = match payload.status.as_deref() {
        None => PhotoStatus::Uploaded,
        Some(s) if STORABLE_STATUSES.contains(&s) => PhotoStatus::from(s),
        Some(_) => return Err(ApiError::BadRequest("Invalid status".to_string()).into()),
    };

    let photo = photos
        .create_photo(payload.into_new_photo(user.as_str(), tool, status))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "photoId": photo.id,
                "message": "Photo stored successfully",
            }
        })),
    ))
}

/// 将照片发送给AI工具处理
///
/// 同步等待AI工具应答（包括重试），处理结果可能稍后通过回调到达
pub async fn process_photo(
    user: UserId,
    Extension(photos): Extension<Arc<PhotoService>>,
    Extension(ai): Extension<Arc<dyn AiProcessingService>>,
    Json(payload): Json<ProcessPhotoRequestDto>,
) -> Result<Response, AppError> {
    if payload.validate().is_err() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()).into());
    }
    let tool = parse_tool(&payload.ai_tool)?;

    if photos
        .get_photo_for_user(&payload.photo_id, user.as_str())
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Photo not found".to_string()).into());
    }

    info!("Sending photo {} to {}", payload.photo_id, tool);
    let result = ai
        .process_photo(AiProcessingRequest {
            photo_id: payload.photo_id.clone(),
            image_url: payload.image_url,
            ai_tool: tool,
            user_id: user.0,
            callback_url: None,
        })
        .await;

    if !result.success {
        let error = result.error.unwrap_or_else(|| "Processing failed".to_string());
        warn!("Processing photo {} failed: {}", payload.photo_id, error);
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": error })),
        )
            .into_response());
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "photoId": payload.photo_id,
            "status": result.photo_status,
            "jobId": result.job_id,
            "processedImageUrl": result.processed_image_url,
            "message": "Photo processing started successfully",
        }
    }))
    .into_response())
}

/// 查询照片处理状态
pub async fn processing_status(
    user: UserId,
    Extension(photos): Extension<Arc<PhotoService>>,
    Query(query): Query<ProcessStatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let photo_id = query
        .photo_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Photo ID required".to_string()))?;

    let photo = photos
        .get_photo_for_user(&photo_id, user.as_str())
        .await?
        .ok_or_else(|| ApiError::NotFound("Photo not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "photoId": photo.id,
            "status": photo.status,
            "originalUrl": photo.original_url,
            "editedUrl": photo.edited_url,
            "updatedAt": photo.updated_at,
        }
    })))
}
