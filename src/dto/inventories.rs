use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInventoryRequest {
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize)]
pub struct LowStockItem {
    pub product: Product,
    pub quantity: i32,
}
