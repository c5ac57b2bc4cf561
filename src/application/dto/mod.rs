// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义API请求体和查询参数，在进入领域层之前完成校验
pub mod photo_request;
pub mod webhook_request;
