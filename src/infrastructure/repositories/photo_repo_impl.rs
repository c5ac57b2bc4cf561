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

use crate::domain::models::photo::{Photo, PhotoStatus};
use crate::domain::repositories::photo_repository::{PhotoRepository, RepositoryError};
use crate::infrastructure::database::entities::photo;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;

/// 照片仓库实现
#[derive(Clone)]
pub struct PhotoRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepositoryImpl {
    /// 创建新的照片仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 在单条 UPDATE 中写入给定列并读回记录，记录不存在时返回 `None`
    ///
    /// 写入和读回在同一事务中完成，并发更新不会覆盖彼此未涉及的列。
    async fn modify<F>(&self, id: &str, apply: F) -> Result<Option<Photo>, RepositoryError>
    where
        F: FnOnce(UpdateMany<photo::Entity>) -> UpdateMany<photo::Entity> + Send,
    {
        let txn = self.db.begin().await?;

        let update = photo::Entity::update_many()
            .col_expr(photo::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(photo::Column::Id.eq(id));
        let result = apply(update).exec(&txn).await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let model = photo::Entity::find_by_id(id.to_string()).one(&txn).await?;
        txn.commit().await?;

        Ok(model.map(Into::into))
    }
}

#[async_trait]
impl PhotoRepository for PhotoRepositoryImpl {
    async fn create(&self, photo: &Photo) -> Result<Photo, RepositoryError> {
        let active_model: photo::ActiveModel = photo.clone().into();

        photo::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(photo.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>, RepositoryError> {
        let model = photo::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_id_for_user(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Photo>, RepositoryError> {
        let model = photo::Entity::find()
            .filter(photo::Column::Id.eq(id))
            .filter(photo::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update_status(
        &self,
        id: &str,
        status: &PhotoStatus,
    ) -> Result<Option<Photo>, RepositoryError> {
        let status = status.as_str().to_string();
        self.modify(id, move |update| {
            update.col_expr(photo::Column::Status, Expr::value(status))
        })
        .await
    }

    async fn update_edited_version(
        &self,
        id: &str,
        edited_url: &str,
        status: &PhotoStatus,
    ) -> Result<Option<Photo>, RepositoryError> {
        let edited_url = edited_url.to_string();
        let status = status.as_str().to_string();
        self.modify(id, move |update| {
            update
                .col_expr(photo::Column::EditedUrl, Expr::value(edited_url))
                .col_expr(photo::Column::Status, Expr::value(status))
        })
        .await
    }
}

impl From<photo::Model> for Photo {
    fn from(model: photo::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            ai_tool: model.ai_tool,
            original_url: model.original_url,
            edited_url: model.edited_url,
            thumbnail_url: model.thumbnail_url,
            editing_settings: model.editing_settings,
            price: model.price,
            print_size: model.print_size,
            status: PhotoStatus::from(model.status),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Photo> for photo::ActiveModel {
    fn from(photo: Photo) -> Self {
        Self {
            id: Set(photo.id),
            user_id: Set(photo.user_id),
            title: Set(photo.title),
            ai_tool: Set(photo.ai_tool),
            original_url: Set(photo.original_url),
            edited_url: Set(photo.edited_url),
            thumbnail_url: Set(photo.thumbnail_url),
            editing_settings: Set(photo.editing_settings),
            price: Set(photo.price),
            print_size: Set(photo.print_size),
            status: Set(photo.status.as_str().to_string()),
            created_at: Set(photo.created_at.into()),
            updated_at: Set(photo.updated_at.into()),
        }
    }
}
