// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 隐藏URL中的凭据、端口、查询参数和片段，用于日志和状态展示
pub fn mask_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}://{}{}", url.scheme(), host, url.path()),
            None => "Invalid URL".to_string(),
        },
        Err(_) => "Invalid URL".to_string(),
    }
}

/// 拼接健康检查地址 `<base>/health`
pub fn health_url(base: &str) -> String {
    format!("{}/health", base.trim_end_matches('/'))
}
