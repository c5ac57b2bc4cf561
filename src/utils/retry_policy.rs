// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 退避策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// 指数退避：`base * 2^(attempt-1)`
    Exponential,
    /// 线性退避：`base * attempt`
    Linear,
}

/// 重试策略配置
///
/// 不带抖动，也不包含熔断逻辑，仅决定尝试次数和两次尝试之间的等待时间。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最大尝试次数（包括第一次）
    pub max_attempts: u32,
    /// 初始退避时间
    pub base_delay: Duration,
    /// 最大退避时间
    pub max_delay: Option<Duration>,
    /// 退避策略
    pub strategy: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::database_webhook()
    }
}

impl RetryPolicy {
    /// 指数退避策略
    pub fn exponential(max_attempts: u32, base_delay: Duration, max_delay: Option<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            strategy: BackoffStrategy::Exponential,
        }
    }

    /// 线性退避策略
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: None,
            strategy: BackoffStrategy::Linear,
        }
    }

    /// 数据库事件Webhook策略：3次尝试，1s、2s，上限10s
    pub fn database_webhook() -> Self {
        Self::exponential(3, Duration::from_secs(1), Some(Duration::from_secs(10)))
    }

    /// AI处理请求策略：3次尝试，2s、4s
    pub fn ai_processing() -> Self {
        Self::linear(3, Duration::from_secs(2))
    }

    /// 计算第 `attempt` 次失败之后的退避时间（`attempt` 从1开始）
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let backoff = match self.strategy {
            BackoffStrategy::Exponential => {
                let factor = 2u32.checked_pow(attempt - 1).unwrap_or(u32::MAX);
                self.base_delay.saturating_mul(factor)
            }
            BackoffStrategy::Linear => self.base_delay.saturating_mul(attempt),
        };

        match self.max_delay {
            Some(max) => backoff.min(max),
            None => backoff,
        }
    }

    /// 是否还允许下一次尝试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// 第 `attempt` 次失败后需要等待的时间，最后一次失败返回 `None`
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        self.should_retry(attempt)
            .then(|| self.calculate_backoff(attempt))
    }
}
