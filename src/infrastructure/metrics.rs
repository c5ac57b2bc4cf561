// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装 Prometheus 导出器并注册Webhook相关指标的说明
///
/// # 参数
///
/// * `listen` - 导出器监听地址，如 `0.0.0.0:9000`
pub fn init_metrics(listen: &str) {
    let addr: SocketAddr = match listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}. Metrics exporter disabled.", listen, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(
        "webhook_delivery_attempts_total",
        "Outbound webhook HTTP attempts"
    );
    describe_counter!(
        "webhook_delivery_success_total",
        "Outbound webhooks acknowledged with a 2xx response"
    );
    describe_counter!(
        "webhook_delivery_failed_total",
        "Failed outbound webhook attempts by reason"
    );
    describe_counter!(
        "webhook_delivery_exhausted_total",
        "Outbound webhooks that failed every attempt"
    );
    describe_histogram!(
        "webhook_delivery_duration_seconds",
        Unit::Seconds,
        "Duration of the successful outbound webhook attempt"
    );
    describe_counter!("webhook_callbacks_total", "Inbound AI callbacks by outcome");

    info!("Metrics exporter listening on {}", addr);
}
