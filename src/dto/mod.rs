pub mod inventories;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;

use serde::Serialize;

/// One page of a listing plus the numbers needed to fetch the next.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            items,
            page,
            per_page,
            total,
        }
    }
}
