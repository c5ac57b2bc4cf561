// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节：数据库连接与实体映射、
/// 领域仓库接口的具体实现、出站HTTP投递以及指标导出。
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知具体技术实现。
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod services;
