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

use crate::domain::models::webhook::EndpointHealth;
use crate::utils::errors::DeliveryError;
use crate::utils::retry_policy::RetryPolicy;
use crate::utils::url_utils::{health_url, mask_url};
use metrics::{counter, histogram};
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// 健康检查超时
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 一次成功投递的结果
#[derive(Debug, Clone)]
pub struct DeliveredResponse {
    /// HTTP 状态码
    pub status: u16,
    /// 响应体
    pub body: String,
    /// 实际尝试次数
    pub attempts: u32,
    /// 成功那次请求的耗时
    pub elapsed: Duration,
}

/// 出站Webhook HTTP客户端
///
/// 负责单个目标的请求构建、超时、重试和指标记录。每次尝试失败后
/// 按 [`RetryPolicy`] 等待，所有尝试失败后返回最后一次的错误。
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    policy: RetryPolicy,
    timeout: Duration,
    user_agent: &'static str,
    /// 指标中的目标标签
    target: &'static str,
}

impl WebhookClient {
    /// 创建新的Webhook客户端
    ///
    /// # 参数
    ///
    /// * `target` - 指标中的目标标签，如 `database`
    /// * `user_agent` - 请求携带的 User-Agent
    /// * `policy` - 重试策略
    /// * `timeout` - 单次请求超时
    pub fn new(
        target: &'static str,
        user_agent: &'static str,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            policy,
            timeout,
            user_agent,
            target,
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 以JSON形式POST负载，失败时按策略重试
    ///
    /// # 参数
    ///
    /// * `url` - 目标地址
    /// * `body` - 请求体
    /// * `headers` - 附加请求头
    /// * `bearer` - 可选的 Bearer 令牌
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveredResponse)` - 收到2xx响应
    /// * `Err(DeliveryError)` - 所有尝试均失败，返回最后一次的错误
    pub async fn post_json<T: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        body: &T,
        headers: HeaderMap,
        bearer: Option<&str>,
    ) -> Result<DeliveredResponse, DeliveryError> {
        let masked = mask_url(url);
        let mut attempt = 1;

        loop {
            counter!("webhook_delivery_attempts_total", "target" => self.target).increment(1);
            let start = Instant::now();

            match self.send_once(url, body, headers.clone(), bearer).await {
                Ok((status, body)) => {
                    let elapsed = start.elapsed();
                    histogram!("webhook_delivery_duration_seconds", "target" => self.target)
                        .record(elapsed.as_secs_f64());
                    counter!("webhook_delivery_success_total", "target" => self.target)
                        .increment(1);
                    debug!(
                        "Webhook to {} answered {} on attempt {}",
                        masked, status, attempt
                    );

                    return Ok(DeliveredResponse {
                        status,
                        body,
                        attempts: attempt,
                        elapsed,
                    });
                }
                Err(err) => {
                    counter!(
                        "webhook_delivery_failed_total",
                        "target" => self.target,
                        "reason" => err.reason()
                    )
                    .increment(1);

                    match self.policy.delay_after(attempt) {
                        Some(delay) => {
                            warn!(
                                "Webhook attempt {}/{} to {} failed: {}. Retrying in {}ms",
                                attempt,
                                self.policy.max_attempts,
                                masked,
                                err,
                                delay.as_millis()
                            );
                            sleep(delay).await;
                            attempt += 1;
                        }
                        None => {
                            error!(
                                "Webhook to {} failed after {} attempts: {}",
                                masked, attempt, err
                            );
                            counter!("webhook_delivery_exhausted_total", "target" => self.target)
                                .increment(1);
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    async fn send_once<T: Serialize + ?Sized + Sync>(
        &self,
        url: &str,
        body: &T,
        headers: HeaderMap,
        bearer: Option<&str>,
    ) -> Result<(u16, String), DeliveryError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent)
            .headers(headers)
            .timeout(self.timeout)
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(DeliveryError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        Ok((status.as_u16(), body))
    }

    /// 探测 `<base>/health` 的可用性
    pub async fn probe(&self, base_url: &str) -> EndpointHealth {
        let start = Instant::now();
        let result = self
            .client
            .get(health_url(base_url))
            .header(USER_AGENT, self.user_agent)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        let response_time = Some(start.elapsed().as_millis() as u64);

        match result {
            Ok(resp) if resp.status().is_success() => EndpointHealth {
                available: true,
                response_time,
                error: None,
            },
            Ok(resp) => EndpointHealth {
                available: false,
                response_time,
                error: Some(format!("HTTP {}", resp.status().as_u16())),
            },
            Err(e) => {
                debug!("Health probe for {} failed: {}", mask_url(base_url), e);
                EndpointHealth::unavailable(DeliveryError::from(e).to_string())
            }
        }
    }
}
