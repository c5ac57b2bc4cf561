// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::ai_tool::AiTool;
use crate::domain::models::photo::{NewPhoto, PhotoStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 照片允许的初始状态
pub const STORABLE_STATUSES: [&str; 4] = ["uploaded", "processing", "completed", "failed"];

/// 保存照片记录请求
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorePhotoRequestDto {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub ai_tool: String,
    #[serde(default)]
    #[validate(url)]
    pub original_url: String,
    #[validate(url)]
    pub edited_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    pub editing_settings: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub print_size: String,
    pub status: Option<String>,
}

impl StorePhotoRequestDto {
    /// 转换为领域层的新建数据
    pub fn into_new_photo(self, user_id: &str, tool: AiTool, status: PhotoStatus) -> NewPhoto {
        NewPhoto {
            user_id: user_id.to_string(),
            title: self.title,
            ai_tool: tool.slug().to_string(),
            original_url: self.original_url,
            edited_url: self.edited_url,
            thumbnail_url: self.thumbnail_url,
            editing_settings: self
                .editing_settings
                .unwrap_or_else(|| serde_json::json!({})),
            price: self.price,
            print_size: self.print_size,
            status,
        }
    }
}

/// 发起AI处理请求
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPhotoRequestDto {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub photo_id: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub image_url: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub ai_tool: String,
}

/// 查询处理状态
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatusQuery {
    pub photo_id: Option<String>,
}
