// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::photo::PhotoStatus;
use crate::domain::models::webhook::{CallbackAction, CallbackOutcome, CallbackPayload};
use crate::domain::services::photo_service::PhotoService;
use crate::utils::errors::CallbackError;
use metrics::counter;
use std::sync::Arc;
use tracing::info;

/// 入站回调服务
///
/// 解释AI合作方的回调负载并更新照片状态。
pub struct CallbackService {
    photos: Arc<PhotoService>,
}

impl CallbackService {
    pub fn new(photos: Arc<PhotoService>) -> Self {
        Self { photos }
    }

    /// 处理一次回调
    ///
    /// # 返回值
    ///
    /// * `Ok(CallbackOutcome)` - 已处理（照片不存在时同样视为已处理）
    /// * `Err(CallbackError::MissingPhotoId)` - 缺少照片ID，未做任何更新
    /// * `Err(CallbackError::Repository)` - 存储层失败
    pub async fn handle(
        &self,
        tool: AiTool,
        payload: &CallbackPayload,
    ) -> Result<CallbackOutcome, CallbackError> {
        let photo_id = payload.photo_id().ok_or(CallbackError::MissingPhotoId)?;
        let action = CallbackAction::decide(payload);

        let photo_found = match &action {
            CallbackAction::Complete { edited_url } => self
                .photos
                .update_with_edited_version(photo_id, edited_url)
                .await?
                .is_some(),
            CallbackAction::Fail => self
                .photos
                .update_status(photo_id, PhotoStatus::Failed)
                .await?
                .is_some(),
            CallbackAction::SetStatus(status) => self
                .photos
                .update_status(photo_id, status.clone())
                .await?
                .is_some(),
            CallbackAction::Nothing => self.photos.get_photo(photo_id).await?.is_some(),
        };

        counter!(
            "webhook_callbacks_total",
            "tool" => tool.slug(),
            "outcome" => action.outcome()
        )
        .increment(1);
        info!(
            tool = %tool,
            photo_id = %photo_id,
            outcome = action.outcome(),
            photo_found,
            "Processed AI callback"
        );

        Ok(CallbackOutcome {
            tool,
            photo_id: photo_id.to_string(),
            action,
            photo_found,
        })
    }
}
