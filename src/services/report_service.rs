use crate::{
    db::DbPool,
    dto::reports::{CustomerOrderCount, ProductSales},
    error::AppResult,
    models::{Order, Product},
    params::normalize_limit,
};

/// Most recent orders of one user, newest first.
pub async fn recent_orders_for_user(
    pool: &DbPool,
    user_id: i32,
    limit: Option<i64>,
) -> AppResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, user_id, order_date, status
        FROM orders
        WHERE user_id = $1
        ORDER BY order_date DESC NULLS LAST, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(normalize_limit(limit))
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn top_products_by_price(pool: &DbPool, limit: Option<i64>) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, description, price, created_at
        FROM products
        ORDER BY price DESC, id
        LIMIT $1
        "#,
    )
    .bind(normalize_limit(limit))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Products ranked by revenue, using the price captured on each order line.
pub async fn top_selling_products(
    pool: &DbPool,
    limit: Option<i64>,
) -> AppResult<Vec<ProductSales>> {
    let rows = sqlx::query_as::<_, ProductSales>(
        r#"
        SELECT p.id AS product_id,
               p.name,
               SUM(oi.price * oi.quantity) AS total_sales,
               SUM(oi.quantity)::BIGINT AS units_sold
        FROM order_items oi
        JOIN products p ON oi.product_id = p.id
        GROUP BY p.id, p.name
        ORDER BY total_sales DESC, p.id
        LIMIT $1
        "#,
    )
    .bind(normalize_limit(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn top_customers(
    pool: &DbPool,
    limit: Option<i64>,
) -> AppResult<Vec<CustomerOrderCount>> {
    let rows = sqlx::query_as::<_, CustomerOrderCount>(
        r#"
        SELECT u.id AS user_id, u.name, COUNT(o.id) AS total_orders
        FROM users u
        JOIN orders o ON o.user_id = u.id
        GROUP BY u.id, u.name
        ORDER BY total_orders DESC, u.id
        LIMIT $1
        "#,
    )
    .bind(normalize_limit(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
