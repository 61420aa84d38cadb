mod common;

use order_store::{
    dto::orders::{CreateOrderRequest, OrderLine, PlaceOrderRequest},
    error::AppError,
    services::{order_service, query_service, report_service},
};
use rust_decimal::Decimal;

use common::{create_product, create_user, setup_state};

#[tokio::test]
async fn recent_orders_are_newest_first_and_limited() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "Grace").await?;
    let mut ids = Vec::new();
    for _ in 0..7 {
        let order = order_service::create_order(
            &state,
            CreateOrderRequest {
                user_id: Some(user.id),
                status: None,
            },
        )
        .await?;
        ids.push(order.id);
    }

    let recent = report_service::recent_orders_for_user(&state.pool, user.id, None).await?;
    assert_eq!(recent.len(), 5);
    let expected: Vec<i32> = ids.iter().rev().take(5).copied().collect();
    assert_eq!(recent.iter().map(|o| o.id).collect::<Vec<_>>(), expected);

    let stranger = create_user(&state, "Heidi").await?;
    assert!(
        report_service::recent_orders_for_user(&state.pool, stranger.id, Some(3))
            .await?
            .is_empty()
    );

    Ok(())
}

#[tokio::test]
async fn rankings_are_sorted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "Ivan").await?;
    let product = create_product(&state, "Ranked Thing", "12.00", Some(20)).await?;
    order_service::place_order(
        &state,
        PlaceOrderRequest {
            user_id: Some(user.id),
            status: None,
            items: vec![OrderLine {
                product_id: product.id,
                quantity: 3,
            }],
        },
    )
    .await?;

    let by_price = report_service::top_products_by_price(&state.pool, Some(10)).await?;
    assert!(by_price.len() <= 10);
    assert!(by_price.windows(2).all(|w| w[0].price >= w[1].price));

    let sales = report_service::top_selling_products(&state.pool, Some(100)).await?;
    assert!(sales.windows(2).all(|w| w[0].total_sales >= w[1].total_sales));

    let customers = report_service::top_customers(&state.pool, Some(100)).await?;
    assert!(customers.windows(2).all(|w| w[0].total_orders >= w[1].total_orders));
    assert!(customers.iter().all(|c| c.total_orders > 0));

    // Exact figures for the product created here, via the ad-hoc query path.
    let result = query_service::run_read_only(
        &state,
        &format!(
            "SELECT SUM(oi.price * oi.quantity) AS total_sales FROM order_items oi WHERE oi.product_id = {}",
            product.id
        ),
    )
    .await?;
    assert_eq!(result.rows.len(), 1);
    let total: Decimal = result.rows[0]["total_sales"].to_string().parse()?;
    assert_eq!(total, Decimal::new(3600, 2));

    Ok(())
}

#[tokio::test]
async fn read_only_queries_cannot_write() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let rejected = query_service::run_read_only(&state, "DELETE FROM users").await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));

    // Passes the keyword guard, but the READ ONLY transaction refuses the write.
    let sneaky = query_service::run_read_only(
        &state,
        "SELECT * FROM (SELECT setval('users_id_seq', nextval('users_id_seq'))) s",
    )
    .await;
    assert!(sneaky.is_err());

    let fenced = query_service::run_read_only(&state, "```sql\nSELECT 1 AS one;\n```").await?;
    assert_eq!(fenced.sql, "SELECT 1 AS one");
    assert_eq!(fenced.rows, vec![serde_json::json!({ "one": 1 })]);
    assert!(!fenced.truncated);

    Ok(())
}

#[tokio::test]
async fn read_only_results_are_capped() -> anyhow::Result<()> {
    let Some(mut state) = setup_state().await? else {
        return Ok(());
    };
    state.limits.row_limit = 3;

    let result = query_service::run_read_only(&state, "SELECT g FROM generate_series(1, 10) AS g").await?;
    assert_eq!(result.rows.len(), 3);
    assert!(result.truncated);

    Ok(())
}

#[tokio::test]
async fn trailing_line_comment_is_allowed() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    create_product(&state, "Commented Item", "0.50", None).await?;
    let result =
        query_service::run_read_only(&state, "SELECT name FROM products -- cheapest first").await?;
    assert!(!result.rows.is_empty());
    assert!(result.rows.iter().all(|row| row.get("name").is_some()));

    Ok(())
}
