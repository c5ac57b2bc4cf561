// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Webhook投递错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Webhook URL not configured")]
    NotConfigured,

    #[error("Webhook request timed out")]
    Timeout,

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("{0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl DeliveryError {
    /// 指标标签
    pub fn reason(&self) -> &'static str {
        match self {
            DeliveryError::NotConfigured => "not_configured",
            DeliveryError::Timeout => "timeout",
            DeliveryError::Http { .. } => "http_error",
            DeliveryError::Network(_) => "network_error",
            DeliveryError::Decode(_) => "decode_error",
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout
        } else if err.is_decode() || err.is_body() {
            DeliveryError::Decode(err.to_string())
        } else {
            DeliveryError::Network(err.to_string())
        }
    }
}

/// 回调处理错误类型
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("Photo ID is required")]
    MissingPhotoId,

    #[error("仓库错误: {0}")]
    Repository(#[from] crate::domain::repositories::photo_repository::RepositoryError),
}
