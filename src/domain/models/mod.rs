// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含照片、订单快照、AI工具以及Webhook信封等核心实体
pub mod ai_tool;
pub mod order;
pub mod photo;
pub mod webhook;
