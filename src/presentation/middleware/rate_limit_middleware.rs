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

use crate::config::settings::RateLimitingSettings;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// 速率限制错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    /// 请求过多错误
    #[error("Rate limit exceeded")]
    TooManyRequests {
        /// 窗口上限
        limit: u32,
        /// 距离窗口重置的时间
        retry_after: Duration,
    },
}

/// 单个键的固定窗口
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// 一次放行的检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// 速率限制器
///
/// 以 `identifier:action` 为键的固定窗口计数器。计数在 DashMap
/// 的条目锁内完成，多线程运行时下同一个键不会重复放行。
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// 创建新的速率限制器实例
    ///
    /// # 参数
    ///
    /// * `max_requests` - 每个窗口允许的请求数
    /// * `window` - 窗口长度
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_settings(settings: &RateLimitingSettings) -> Self {
        Self::new(settings.max_requests, Duration::from_secs(settings.window_secs))
    }

    /// 检查并计数一次请求
    ///
    /// # 返回值
    ///
    /// * `Ok(RateLimitDecision)` - 请求被放行
    /// * `Err(RateLimitError)` - 当前窗口已用完
    pub fn check(&self, identifier: &str, action: &str) -> Result<RateLimitDecision, RateLimitError> {
        self.check_at(identifier, action, Instant::now())
    }

    pub(crate) fn check_at(
        &self,
        identifier: &str,
        action: &str,
        now: Instant,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let key = format!("{}:{}", identifier, action);
        let mut entry = self.windows.entry(key).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if entry.reset_at <= now {
            *entry = Window {
                count: 0,
                reset_at: now + self.window,
            };
        }

        let reset_after = entry.reset_at.saturating_duration_since(now);

        if entry.count >= self.max_requests {
            return Err(RateLimitError::TooManyRequests {
                limit: self.max_requests,
                retry_after: reset_after,
            });
        }

        entry.count += 1;
        Ok(RateLimitDecision {
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
            reset_after,
        })
    }

    /// 清理已过期的窗口
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.windows.retain(|_, window| window.reset_at > now);
    }

    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

/// 获取客户端标识：优先 `X-User-Id`，其次 `X-Forwarded-For` 中的第一个地址
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(user_id) = header_str(headers, "x-user-id") {
        return format!("user:{}", user_id);
    }

    let ip = header_str(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown");
    format!("ip:{}", ip)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// 速率限制中间件
///
/// 按 `METHOD:path` 动作对每个客户端分别计数
///
/// # 参数
///
/// * `rate_limiter` - 速率限制器
/// * `request` - HTTP请求
/// * `next` - 下一个中间件
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let identifier = client_identifier(request.headers());
    let action = format!("{}:{}", request.method(), request.uri().path());

    match rate_limiter.check(&identifier, &action) {
        Ok(_) => next.run(request).await,
        Err(err @ RateLimitError::TooManyRequests { limit, retry_after }) => {
            warn!("Rate limit exceeded for {} on {}", identifier, action);
            too_many_requests(&err, limit, retry_after)
        }
    }
}

fn too_many_requests(err: &RateLimitError, limit: u32, retry_after: Duration) -> Response {
    let retry_secs = retry_after.as_millis().div_ceil(1000) as u64;
    let reset_at = Utc::now().timestamp_millis() + retry_after.as_millis() as i64;

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": err.to_string(), "retryAfter": retry_secs })),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert("Retry-After", HeaderValue::from(retry_secs));
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_at));
    response
}
