use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::{
    dto::orders::AddOrderItemRequest,
    entity::{
        order_items::{ActiveModel, Column, Entity as OrderItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    models::OrderItem,
    state::AppState,
    validation::{validate_line_quantity, validate_price},
};

/// Adds a line to an existing order. Stock is left untouched; use
/// `order_service::place_order` for the stock-aware path.
pub async fn add_order_item(state: &AppState, payload: AddOrderItemRequest) -> AppResult<OrderItem> {
    let quantity = validate_line_quantity(payload.quantity)?;
    let price = match payload.price {
        Some(price) => validate_price(price)?,
        None => {
            let product = Products::find_by_id(payload.product_id)
                .one(&state.orm)
                .await?;
            match product {
                Some(p) => p.price,
                None => return Err(AppError::NotFound("product")),
            }
        }
    };

    let item = ActiveModel {
        id: NotSet,
        order_id: Set(Some(payload.order_id)),
        product_id: Set(Some(payload.product_id)),
        quantity: Set(quantity),
        price: Set(price),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        order_id = ?item.order_id,
        product_id = ?item.product_id,
        item_id = item.id,
        "order item added"
    );
    Ok(item.into())
}

pub async fn get_order_item(state: &AppState, id: i32) -> AppResult<OrderItem> {
    let item = OrderItems::find_by_id(id).one(&state.orm).await?;
    match item {
        Some(i) => Ok(i.into()),
        None => Err(AppError::NotFound("order item")),
    }
}

pub async fn list_order_items(state: &AppState, order_id: i32) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(Column::OrderId.eq(order_id))
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(items)
}

pub async fn update_order_item_quantity(
    state: &AppState,
    id: i32,
    quantity: i32,
) -> AppResult<OrderItem> {
    let quantity = validate_line_quantity(quantity)?;
    let existing = OrderItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound("order item")),
    };

    let mut active: ActiveModel = existing.into();
    active.quantity = Set(quantity);
    let item = active.update(&state.orm).await?;
    tracing::info!(item_id = item.id, quantity, "order item updated");
    Ok(item.into())
}

pub async fn remove_order_item(state: &AppState, id: i32) -> AppResult<()> {
    let result = OrderItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("order item"));
    }
    tracing::info!(item_id = id, "order item removed");
    Ok(())
}
