use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub user_id: Option<i32>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LowStockQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub threshold: Option<i32>,
}

/// Row cap for the report queries; reports default to a top five.
pub fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(5).clamp(1, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, (1, 20, 0))]
    #[case(Some(3), Some(10), (3, 10, 20))]
    #[case(Some(0), Some(0), (1, 1, 0))]
    #[case(Some(-4), Some(1_000), (1, 100, 0))]
    fn pagination_is_clamped(
        #[case] page: Option<i64>,
        #[case] per_page: Option<i64>,
        #[case] expected: (i64, i64, i64),
    ) {
        assert_eq!(Pagination { page, per_page }.normalize(), expected);
    }

    #[test]
    fn report_limit_defaults_to_five() {
        assert_eq!(normalize_limit(None), 5);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(500)), 100);
    }
}
