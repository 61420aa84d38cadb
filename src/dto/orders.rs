use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderItem};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub user_id: Option<i32>,
    pub status: Option<String>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddOrderItemRequest {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Defaults to the product's current price.
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

impl OrderWithItems {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            order,
            items,
            total,
        }
    }
}
