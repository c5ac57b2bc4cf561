// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 提供出站Webhook投递和AI处理请求的服务实现
pub mod ai_processing_service_impl;
pub mod database_webhook_service_impl;
pub mod webhook_client;
