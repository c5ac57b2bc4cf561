// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::photo::{Photo, PhotoStatus};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// 照片仓库特质
///
/// 更新操作在记录不存在时返回 `Ok(None)`，不视为错误。
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// 创建照片记录
    async fn create(&self, photo: &Photo) -> Result<Photo, RepositoryError>;
    /// 根据ID查找照片
    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>, RepositoryError>;
    /// 查找属于指定用户的照片
    async fn find_by_id_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Photo>, RepositoryError>;
    /// 更新照片状态
    async fn update_status(
        &self,
        id: &str,
        status: &PhotoStatus,
    ) -> Result<Option<Photo>, RepositoryError>;
    /// 写入处理后的图片地址并更新状态
    async fn update_edited_version(
        &self,
        id: &str,
        edited_url: &str,
        status: &PhotoStatus,
    ) -> Result<Option<Photo>, RepositoryError>;
}
