use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::entity::{inventories, order_items, orders, products, users};

pub const ORDER_STATUS_PENDING: &str = "pending";

/// Statuses the tooling knows about. The column itself accepts any short
/// string, so this list is advisory.
pub const KNOWN_ORDER_STATUSES: [&str; 5] =
    [ORDER_STATUS_PENDING, "paid", "shipped", "completed", "cancelled"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Inventory {
    pub product_id: i32,
    pub quantity: i32,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i32,
    pub user_id: Option<i32>,
    pub order_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            created_at: model.created_at,
        }
    }
}

impl From<inventories::Model> for Inventory {
    fn from(model: inventories::Model) -> Self {
        Self {
            product_id: model.product_id,
            quantity: model.quantity,
            updated_at: model.updated_at,
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            order_date: model.order_date,
            status: model.status,
        }
    }
}

impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price: model.price,
        }
    }
}
