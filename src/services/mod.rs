pub mod inventory_service;
pub mod order_item_service;
pub mod order_service;
pub mod product_service;
pub mod query_service;
pub mod report_service;
pub mod user_service;
