use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSales {
    pub product_id: i32,
    pub name: String,
    pub total_sales: Decimal,
    pub units_sold: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerOrderCount {
    pub user_id: i32,
    pub name: String,
    pub total_orders: i64,
}

#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub sql: String,
    pub rows: Vec<Value>,
    pub truncated: bool,
}
