// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 照片实体
///
/// 表示用户上传的一张照片及其AI处理结果。入站回调和AI处理流程
/// 只会修改其中的 `status`、`edited_url` 和 `updated_at`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// 照片唯一标识符
    pub id: String,
    /// 所属用户ID
    pub user_id: String,
    /// 标题
    pub title: String,
    /// 选择的AI工具标识
    pub ai_tool: String,
    /// 原图地址
    pub original_url: String,
    /// AI处理后的图片地址
    pub edited_url: Option<String>,
    /// 缩略图地址
    pub thumbnail_url: Option<String>,
    /// 打印/编辑选项
    pub editing_settings: serde_json::Value,
    /// 价格
    pub price: f64,
    /// 打印尺寸
    pub print_size: String,
    /// 处理状态
    pub status: PhotoStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 新建照片所需数据
#[derive(Debug, Clone)]
pub struct NewPhoto {
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
}

impl Photo {
    /// 根据新建数据生成照片实体
    pub fn new(data: NewPhoto) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id,
            title: data.title,
            ai_tool: data.ai_tool,
            original_url: data.original_url,
            edited_url: data.edited_url,
            thumbnail_url: data.thumbnail_url,
            editing_settings: data.editing_settings,
            price: data.price,
            print_size: data.print_size,
            status: data.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 照片处理状态
///
/// 合作方回调可能报告任意状态字符串，未知值原样保存在 `Other` 中。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhotoStatus {
    /// 已上传，尚未处理
    #[default]
    Uploaded,
    /// 处理中
    Processing,
    /// 处理完成
    Completed,
    /// 处理失败
    Failed,
    /// 其他合作方上报的状态
    Other(String),
}

impl PhotoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PhotoStatus::Uploaded => "uploaded",
            PhotoStatus::Processing => "processing",
            PhotoStatus::Completed => "completed",
            PhotoStatus::Failed => "failed",
            PhotoStatus::Other(s) => s,
        }
    }
}

impl From<&str> for PhotoStatus {
    fn from(value: &str) -> Self {
        match value {
            "uploaded" => PhotoStatus::Uploaded,
            "processing" => PhotoStatus::Processing,
            "completed" => PhotoStatus::Completed,
            "failed" => PhotoStatus::Failed,
            other => PhotoStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PhotoStatus {
    fn from(value: String) -> Self {
        PhotoStatus::from(value.as_str())
    }
}

impl From<PhotoStatus> for String {
    fn from(status: PhotoStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
