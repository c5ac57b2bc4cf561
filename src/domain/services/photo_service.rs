// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::photo::{NewPhoto, Photo, PhotoStatus};
use crate::domain::models::webhook::WebhookPayload;
use crate::domain::repositories::photo_repository::{PhotoRepository, RepositoryError};
use crate::domain::services::webhook_service::EventPublisher;
use std::sync::Arc;
use tracing::{debug, warn};

/// 编辑版本写入时随 `photo_updated` 事件上报的字段
pub const EDITED_VERSION_CHANGES: [&str; 2] = ["editedUrl", "status"];

/// 仅状态变化时上报的字段
pub const STATUS_CHANGES: [&str; 1] = ["status"];

/// 照片服务
///
/// 封装照片记录的读写，并在写入成功后发布对应的数据库事件。
/// 事件发布不会影响写入结果。
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository>,
    events: Arc<dyn EventPublisher>,
}

impl PhotoService {
    /// 创建新的照片服务
    ///
    /// # 参数
    ///
    /// * `repo` - 照片仓库
    /// * `events` - 事件发布器
    pub fn new(repo: Arc<dyn PhotoRepository>, events: Arc<dyn EventPublisher>) -> Self {
        Self { repo, events }
    }

    /// 保存新照片并发布 `photo_created` 事件
    pub async fn create_photo(&self, data: NewPhoto) -> Result<Photo, RepositoryError> {
        let photo = self.repo.create(&Photo::new(data)).await?;
        debug!("Photo {} created for user {}", photo.id, photo.user_id);

        self.events
            .publish(WebhookPayload::photo_created(&photo, photo.user_id.clone()));

        Ok(photo)
    }

    /// 根据ID获取照片
    pub async fn get_photo(&self, id: &str) -> Result<Option<Photo>, RepositoryError> {
        self.repo.find_by_id(id).await
    }

    /// 获取属于指定用户的照片
    pub async fn get_photo_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Photo>, RepositoryError> {
        self.repo.find_by_id_for_user(id, user_id).await
    }

    /// 更新照片状态并发布 `photo_updated` 事件
    ///
    /// 记录不存在时返回 `Ok(None)`，不发布事件
    pub async fn update_status(
        &self,
        id: &str,
        status: PhotoStatus,
    ) -> Result<Option<Photo>, RepositoryError> {
        let updated = self.repo.update_status(id, &status).await?;

        match &updated {
            Some(photo) => self.events.publish(WebhookPayload::photo_updated(
                photo,
                photo.user_id.clone(),
                &STATUS_CHANGES,
            )),
            None => warn!("Status update for unknown photo {} ignored", id),
        }

        Ok(updated)
    }

    /// 写入处理后的版本并标记完成，发布 `photo_updated` 事件
    pub async fn update_with_edited_version(
        &self,
        id: &str,
        edited_url: &str,
    ) -> Result<Option<Photo>, RepositoryError> {
        let updated = self
            .repo
            .update_edited_version(id, edited_url, &PhotoStatus::Completed)
            .await?;

        match &updated {
            Some(photo) => self.events.publish(WebhookPayload::photo_updated(
                photo,
                photo.user_id.clone(),
                &EDITED_VERSION_CHANGES,
            )),
            None => warn!("Edited version for unknown photo {} ignored", id),
        }

        Ok(updated)
    }
}
