// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod ai_processing_test;
pub mod health_check;
pub mod photo_api_test;
pub mod photo_repository_test;
pub mod rate_limit_test;
