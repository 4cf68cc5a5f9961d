//! # Order Types
//!
//! Cart, order, and line item types for the checkout flow.

use crate::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address recorded on orders until the cart payload carries one
pub const PLACEHOLDER_ADDRESS: &str = "123 Main St";

/// One line of a cart submitted for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID
    pub product_id: i64,
    /// Requested units
    pub quantity: i32,
}

impl CartItem {
    pub fn new(product_id: i64, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created by checkout, awaiting fulfilment
    Pending,
    /// Fulfilled
    Completed,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: i64,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    pub address: String,
}

impl NewOrder {
    /// A pending order shipping to the placeholder address
    pub fn pending(user_id: i64, total: f64) -> Self {
        Self {
            user_id,
            total,
            status: OrderStatus::Pending,
            address: PLACEHOLDER_ADDRESS.to_string(),
        }
    }
}

/// A persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total: f64,
    pub status: OrderStatus,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// A line item belonging to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price captured at checkout time
    pub price: f64,
}

/// A validated cart line paired with the product it was checked against
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshot
    pub unit_price: f64,
    /// Stock seen during validation
    pub stock_seen: i32,
}

impl OrderLine {
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            stock_seen: product.quantity,
        }
    }

    /// Price of this line
    pub fn total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    /// Convert into a line item for a freshly created order
    pub fn into_item(&self, order_id: i64) -> OrderItem {
        OrderItem {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            price: self.unit_price,
        }
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: i64,
    pub total_price: f64,
}
