// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含照片状态管理、入站回调处理以及出站Webhook服务接口
pub mod callback_service;
pub mod photo_service;
pub mod webhook_service;
