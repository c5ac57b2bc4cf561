// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 订单快照
///
/// 订单本身由店面的订单模块持久化，这里只保存随 `order_created`
/// 事件发送的非规范化字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub shipping_address: ShippingAddress,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 订单行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub photo_title: String,
    pub photo_url: String,
    pub print_size: String,
    pub quantity: u32,
    pub price: f64,
}

/// 收货地址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
