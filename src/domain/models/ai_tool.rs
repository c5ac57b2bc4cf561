// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AI修图工具
///
/// 每个工具对应一个外部AI处理服务，拥有独立的处理端点、
/// 认证令牌和入站回调路由。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiTool {
    /// 签证照片
    VisaPhoto,
    /// 政府门户（Absher）证件照
    Absher,
    /// 风格化肖像
    SaudiLook,
    /// 婴儿照片
    BabyPhoto,
}

impl AiTool {
    /// 所有支持的AI工具
    pub const ALL: [AiTool; 4] = [
        AiTool::VisaPhoto,
        AiTool::Absher,
        AiTool::SaudiLook,
        AiTool::BabyPhoto,
    ];

    /// 路由和负载中使用的标识
    pub fn slug(&self) -> &'static str {
        match self {
            AiTool::VisaPhoto => "visa-photo",
            AiTool::Absher => "absher",
            AiTool::SaudiLook => "saudi-look",
            AiTool::BabyPhoto => "baby-photo",
        }
    }

    /// 健康检查中报告的服务名
    pub fn service_name(&self) -> String {
        format!("{}-webhook", self.slug())
    }

    /// 未配置URL时使用的默认处理端点
    pub fn default_endpoint(&self) -> String {
        format!("https://api.example.com/{}/process", self.slug())
    }
}

impl fmt::Display for AiTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 未知AI工具错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported AI tool: {0}")]
pub struct UnknownAiTool(pub String);

impl FromStr for AiTool {
    type Err = UnknownAiTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiTool::ALL
            .into_iter()
            .find(|tool| tool.slug() == s)
            .ok_or_else(|| UnknownAiTool(s.to_string()))
    }
}
