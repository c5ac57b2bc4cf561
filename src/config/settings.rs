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

use crate::domain::models::ai_tool::AiTool;
use crate::utils::retry_policy::RetryPolicy;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、数据库、指标、速率限制和Webhook等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// Webhook 配置
    pub webhooks: WebhookSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// Prometheus 指标配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用指标导出
    pub enabled: bool,
    /// 指标监听地址
    pub listen: String,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 是否启用速率限制
    pub enabled: bool,
    /// 时间窗口（秒）
    pub window_secs: u64,
    /// 窗口内允许的最大请求数
    pub max_requests: u32,
}

/// Webhook配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    /// 对外可访问的服务地址，用于生成AI回调URL
    pub public_base_url: String,
    /// 数据库事件Webhook
    pub database: DatabaseWebhookSettings,
    /// AI工具端点
    #[serde(default)]
    pub ai_tools: AiToolsSettings,
    /// AI请求单次超时（毫秒）
    pub ai_timeout_ms: u64,
    /// AI请求最大尝试次数
    pub ai_max_attempts: u32,
    /// AI请求重试基础间隔（毫秒）
    pub ai_base_delay_ms: u64,
}

/// 数据库事件Webhook配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseWebhookSettings {
    /// 目标URL，未配置时不投递
    pub url: Option<String>,
    /// Bearer 令牌
    pub auth_token: Option<String>,
    /// 单次请求超时（毫秒）
    pub timeout_ms: u64,
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 指数退避基础间隔（毫秒）
    pub base_delay_ms: u64,
    /// 退避上限（毫秒）
    pub max_delay_ms: u64,
}

/// 单个AI工具的端点配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiToolEndpoint {
    /// 处理端点URL
    pub url: Option<String>,
    /// 出站与入站共用的 Bearer 令牌
    pub auth_token: Option<String>,
}

/// 四个AI工具的端点配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiToolsSettings {
    #[serde(default)]
    pub visa_photo: AiToolEndpoint,
    #[serde(default)]
    pub absher: AiToolEndpoint,
    #[serde(default)]
    pub saudi_look: AiToolEndpoint,
    #[serde(default)]
    pub baby_photo: AiToolEndpoint,
}

impl AiToolsSettings {
    /// 获取指定AI工具的端点配置
    pub fn endpoint(&self, tool: AiTool) -> &AiToolEndpoint {
        match tool {
            AiTool::VisaPhoto => &self.visa_photo,
            AiTool::Absher => &self.absher,
            AiTool::SaudiLook => &self.saudi_look,
            AiTool::BabyPhoto => &self.baby_photo,
        }
    }

    /// 获取指定AI工具的认证令牌（空字符串视为未配置）
    pub fn auth_token(&self, tool: AiTool) -> Option<&str> {
        non_empty(self.endpoint(tool).auth_token.as_deref())
    }
}

impl DatabaseWebhookSettings {
    /// 构建数据库Webhook的重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Some(Duration::from_millis(self.max_delay_ms)),
        )
    }

    /// 单次请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl WebhookSettings {
    /// 构建AI处理请求的重试策略
    pub fn ai_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(
            self.ai_max_attempts,
            Duration::from_millis(self.ai_base_delay_ms),
        )
    }

    /// AI请求单次超时
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_millis(self.ai_timeout_ms)
    }

    /// 生成指定AI工具的回调URL
    pub fn callback_url(&self, tool: AiTool) -> String {
        format!(
            "{}/api/webhooks/{}",
            self.public_base_url.trim_end_matches('/'),
            tool.slug()
        )
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Plain environment variables shared with the storefront deployment.
const PLAIN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("PUBLIC_BASE_URL", "webhooks.public_base_url"),
    ("DATABASE_WEBHOOK_URL", "webhooks.database.url"),
    ("DATABASE_WEBHOOK_AUTH_TOKEN", "webhooks.database.auth_token"),
    ("VISA_PHOTO_WEBHOOK_URL", "webhooks.ai_tools.visa_photo.url"),
    ("VISA_PHOTO_AUTH_TOKEN", "webhooks.ai_tools.visa_photo.auth_token"),
    ("ABSHER_WEBHOOK_URL", "webhooks.ai_tools.absher.url"),
    ("ABSHER_AUTH_TOKEN", "webhooks.ai_tools.absher.auth_token"),
    ("SAUDI_LOOK_WEBHOOK_URL", "webhooks.ai_tools.saudi_look.url"),
    ("SAUDI_LOOK_AUTH_TOKEN", "webhooks.ai_tools.saudi_look.auth_token"),
    ("BABY_PHOTO_WEBHOOK_URL", "webhooks.ai_tools.baby_photo.url"),
    ("BABY_PHOTO_AUTH_TOKEN", "webhooks.ai_tools.baby_photo.auth_token"),
];

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件和环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PHOTOPRINT").separator("__"));

        for (var, key) in PLAIN_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    /// 仅使用内置默认值构建配置（不读取文件和环境变量）
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB settings
            .set_default("database.url", "sqlite://photoprint.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default metrics settings
            .set_default("metrics.enabled", true)?
            .set_default("metrics.listen", "0.0.0.0:9000")?
            // Default Rate Limiting settings
            .set_default("rate_limiting.enabled", true)?
            .set_default("rate_limiting.window_secs", 60)?
            .set_default("rate_limiting.max_requests", 100)?
            // Default Webhook settings
            .set_default("webhooks.public_base_url", "http://localhost:3000")?
            .set_default("webhooks.database.timeout_ms", 30_000)?
            .set_default("webhooks.database.max_attempts", 3)?
            .set_default("webhooks.database.base_delay_ms", 1_000)?
            .set_default("webhooks.database.max_delay_ms", 10_000)?
            .set_default("webhooks.ai_timeout_ms", 60_000)?
            .set_default("webhooks.ai_max_attempts", 3)?
            .set_default("webhooks.ai_base_delay_ms", 2_000)
    }
}
