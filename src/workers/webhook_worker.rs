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

use crate::domain::models::webhook::{DeliveryResult, WebhookPayload};
use crate::domain::services::webhook_service::{DatabaseWebhookService, EventPublisher};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Webhook工作器
///
/// 在独立的tokio任务中投递数据库事件，调用方不等待结果。
/// 投递失败只记录日志，不会回传给触发事件的请求。
#[derive(Clone)]
pub struct WebhookWorker {
    /// 数据库Webhook服务
    service: Arc<dyn DatabaseWebhookService>,
}

impl WebhookWorker {
    /// 创建新的Webhook工作器实例
    ///
    /// # 参数
    ///
    /// * `service` - 数据库Webhook服务
    ///
    /// # 返回值
    ///
    /// 返回新的Webhook工作器实例
    pub fn new(service: Arc<dyn DatabaseWebhookService>) -> Self {
        Self { service }
    }

    /// 在后台任务中投递事件
    ///
    /// 返回的句柄仅供测试等待结果，正常调用方直接丢弃。
    pub fn dispatch(&self, payload: WebhookPayload) -> JoinHandle<DeliveryResult> {
        let service = self.service.clone();
        tokio::spawn(async move {
            let result = service.deliver(&payload).await;
            if result.success {
                debug!("Background {} webhook delivered", payload.event);
            } else {
                error!(
                    "Background {} webhook for user {} failed: {}",
                    payload.event,
                    payload.user_id,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            result
        })
    }
}

impl EventPublisher for WebhookWorker {
    fn publish(&self, payload: WebhookPayload) {
        drop(self.dispatch(payload));
    }
}
