mod common;

use order_store::{
    dto::{
        inventories::CreateInventoryRequest,
        orders::{AddOrderItemRequest, CreateOrderRequest},
        users::CreateUserRequest,
    },
    error::{AppError, ConstraintKind},
    models::ORDER_STATUS_PENDING,
    schema,
    services::{
        inventory_service, order_item_service, order_service, product_service, user_service,
    },
};
use rust_decimal::Decimal;

use common::{create_product, create_user, setup_state, unique_email};

// Walks the reference scenario end to end: unique email, defaults, the
// (order, product) uniqueness and the product cascade.
#[tokio::test]
async fn alice_widget_scenario() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let email = unique_email("alice");
    let alice = user_service::create_user(
        &state,
        CreateUserRequest {
            name: "Alice".into(),
            email: email.clone(),
        },
    )
    .await?;
    assert!(alice.id > 0);
    assert_eq!(alice.email, email);

    let duplicate = user_service::create_user(
        &state,
        CreateUserRequest {
            name: "Alice Again".into(),
            email: email.clone(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(duplicate.constraint_kind(), Some(ConstraintKind::Unique));

    let widget = create_product(&state, "Widget", "9.99", None).await?;
    assert_eq!(widget.price, Decimal::new(999, 2));

    let inventory = inventory_service::create_inventory(
        &state,
        CreateInventoryRequest {
            product_id: widget.id,
            quantity: Some(10),
        },
    )
    .await?;
    assert_eq!(inventory.quantity, 10);

    let order = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: Some(alice.id),
            status: None,
        },
    )
    .await?;
    assert_eq!(order.status.as_deref(), Some(ORDER_STATUS_PENDING));

    let item = order_item_service::add_order_item(
        &state,
        AddOrderItemRequest {
            order_id: order.id,
            product_id: widget.id,
            quantity: 2,
            price: Some(Decimal::new(999, 2)),
        },
    )
    .await?;
    assert_eq!(item.line_total(), Decimal::new(1998, 2));

    let second = order_item_service::add_order_item(
        &state,
        AddOrderItemRequest {
            order_id: order.id,
            product_id: widget.id,
            quantity: 1,
            price: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(second.constraint_kind(), Some(ConstraintKind::Unique));

    product_service::delete_product(&state, widget.id).await?;

    assert!(matches!(
        inventory_service::get_inventory(&state, widget.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        order_item_service::get_order_item(&state, item.id).await,
        Err(AppError::NotFound(_))
    ));
    // The order itself belongs to Alice, not to the product.
    assert!(order_service::get_order(&state, order.id).await?.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn deleting_user_cascades_to_orders_and_items() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "Carol").await?;
    let product = create_product(&state, "Cascade Mug", "4.50", Some(3)).await?;
    let order = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: Some(user.id),
            status: Some("paid".into()),
        },
    )
    .await?;
    let item = order_item_service::add_order_item(
        &state,
        AddOrderItemRequest {
            order_id: order.id,
            product_id: product.id,
            quantity: 1,
            price: None,
        },
    )
    .await?;
    assert_eq!(item.price, Decimal::new(450, 2));

    user_service::delete_user(&state, user.id).await?;

    assert!(matches!(
        order_service::get_order(&state, order.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        order_item_service::get_order_item(&state, item.id).await,
        Err(AppError::NotFound(_))
    ));
    // Products are not owned by users.
    assert_eq!(product_service::get_product(&state, product.id).await?.id, product.id);
    assert_eq!(inventory_service::get_inventory(&state, product.id).await?.quantity, 3);

    Ok(())
}

#[tokio::test]
async fn deleting_order_cascades_to_items_only() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "Dave").await?;
    let product = create_product(&state, "Cascade Lamp", "30.00", None).await?;
    let order = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: Some(user.id),
            status: None,
        },
    )
    .await?;
    order_item_service::add_order_item(
        &state,
        AddOrderItemRequest {
            order_id: order.id,
            product_id: product.id,
            quantity: 4,
            price: None,
        },
    )
    .await?;
    assert_eq!(order_item_service::list_order_items(&state, order.id).await?.len(), 1);

    order_service::delete_order(&state, order.id).await?;

    assert!(order_item_service::list_order_items(&state, order.id).await?.is_empty());
    assert_eq!(user_service::get_user(&state, user.id).await?.id, user.id);
    assert_eq!(product_service::get_product(&state, product.id).await?.id, product.id);

    Ok(())
}

#[tokio::test]
async fn defaults_apply_when_values_are_omitted() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let product = create_product(&state, "Default Crate", "1.00", None).await?;
    let inventory = inventory_service::create_inventory(
        &state,
        CreateInventoryRequest {
            product_id: product.id,
            quantity: None,
        },
    )
    .await?;
    assert_eq!(inventory.quantity, 0);

    // user_id is nullable: an anonymous order is allowed.
    let order = order_service::create_order(&state, CreateOrderRequest::default()).await?;
    assert_eq!(order.status.as_deref(), Some("pending"));
    assert_eq!(order.user_id, None);

    Ok(())
}

#[tokio::test]
async fn missing_parents_are_foreign_key_violations() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let err = inventory_service::create_inventory(
        &state,
        CreateInventoryRequest {
            product_id: i32::MAX,
            quantity: Some(1),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

    let err = order_service::create_order(
        &state,
        CreateOrderRequest {
            user_id: Some(i32::MAX),
            status: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

    let product = create_product(&state, "Orphan Check", "2.00", None).await?;
    let err = order_item_service::add_order_item(
        &state,
        AddOrderItemRequest {
            order_id: i32::MAX,
            product_id: product.id,
            quantity: 1,
            price: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

    Ok(())
}

#[tokio::test]
async fn database_rejects_negative_stock_and_nulls() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let product = create_product(&state, "Check Bolt", "0.10", Some(1)).await?;

    // Bypass the service validation to hit the table constraints directly.
    let err: AppError = sqlx::query("UPDATE inventories SET quantity = -1 WHERE product_id = $1")
        .bind(product.id)
        .execute(&state.pool)
        .await
        .unwrap_err()
        .into();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));

    let err: AppError = sqlx::query("INSERT INTO users (name, email) VALUES (NULL, $1)")
        .bind(unique_email("nobody"))
        .execute(&state.pool)
        .await
        .unwrap_err()
        .into();
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::NotNull));

    Ok(())
}

// Only name, email, price and quantity are required; the defaulted columns
// and the order item references still accept NULL.
#[tokio::test]
async fn defaulted_columns_accept_explicit_nulls() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user = create_user(&state, "Ivy").await?;
    let order_id: i32 =
        sqlx::query_scalar("INSERT INTO orders (user_id, status) VALUES ($1, NULL) RETURNING id")
            .bind(user.id)
            .fetch_one(&state.pool)
            .await?;
    let order = order_service::get_order(&state, order_id).await?;
    assert_eq!(order.order.status, None);
    assert!(order.order.order_date.is_some());

    let product = create_product(&state, "Loose Part", "2.00", None).await?;
    let item_id: i32 = sqlx::query_scalar(
        "INSERT INTO order_items (order_id, product_id, quantity, price) \
         VALUES (NULL, $1, 1, 2.00) RETURNING id",
    )
    .bind(product.id)
    .fetch_one(&state.pool)
    .await?;
    let item = order_item_service::get_order_item(&state, item_id).await?;
    assert_eq!(item.order_id, None);
    assert_eq!(item.product_id, Some(product.id));

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (name, email, created_at) VALUES ('Nil', $1, NULL) RETURNING id",
    )
    .bind(unique_email("nil"))
    .fetch_one(&state.pool)
    .await?;
    let nil_user = user_service::get_user(&state, user_id).await?;
    assert_eq!(nil_user.created_at, None);

    Ok(())
}

#[tokio::test]
async fn described_schema_matches_the_database() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    for table in &schema::TABLES {
        let actual: Vec<(String, String, bool)> = sqlx::query_as(
            "SELECT column_name::text, is_nullable::text, column_default IS NOT NULL \
             FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table.name)
        .fetch_all(&state.pool)
        .await?;

        let expected: Vec<(String, String, bool)> = table
            .columns
            .iter()
            .map(|column| {
                let def = column.definition;
                let required = def.contains("NOT NULL") || def.contains("PRIMARY KEY");
                let defaulted = def.contains("DEFAULT") || def.contains("SERIAL");
                (
                    column.name.to_string(),
                    if required { "NO" } else { "YES" }.to_string(),
                    defaulted,
                )
            })
            .collect();

        assert_eq!(actual, expected, "columns of {}", table.name);
    }

    Ok(())
}
