use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        Paged,
        inventories::{CreateInventoryRequest, InventoryAdjustRequest, LowStockItem},
    },
    entity::{
        inventories::{ActiveModel, Column, Entity as Inventories},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    models::{Inventory, Product},
    params::LowStockQuery,
    state::AppState,
    validation::validate_stock_quantity,
};

/// Creates the stock row for a product. Without an explicit quantity the
/// column default (0) applies.
pub async fn create_inventory(
    state: &AppState,
    payload: CreateInventoryRequest,
) -> AppResult<Inventory> {
    let quantity = match payload.quantity {
        Some(q) => Set(validate_stock_quantity(q)?),
        None => NotSet,
    };

    let inventory = ActiveModel {
        product_id: Set(payload.product_id),
        quantity,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        product_id = inventory.product_id,
        quantity = inventory.quantity,
        "inventory created"
    );
    Ok(inventory.into())
}

pub async fn get_inventory(state: &AppState, product_id: i32) -> AppResult<Inventory> {
    let inventory = Inventories::find_by_id(product_id).one(&state.orm).await?;
    match inventory {
        Some(i) => Ok(i.into()),
        None => Err(AppError::NotFound("inventory")),
    }
}

pub async fn set_quantity(state: &AppState, product_id: i32, quantity: i32) -> AppResult<Inventory> {
    let quantity = validate_stock_quantity(quantity)?;
    let inventory = write_quantity(&state.orm, product_id, quantity).await?;
    tracing::info!(product_id, quantity, "inventory set");
    Ok(inventory)
}

/// Applies a signed change to the stock level under a row lock, refusing
/// to go below zero.
pub async fn adjust_inventory(
    state: &AppState,
    product_id: i32,
    payload: InventoryAdjustRequest,
) -> AppResult<Inventory> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let current = Inventories::find_by_id(product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let current = match current {
        Some(i) => i,
        None => return Err(AppError::NotFound("inventory")),
    };

    let new_quantity = current
        .quantity
        .checked_add(payload.delta)
        .ok_or_else(|| AppError::BadRequest("quantity out of range".into()))?;
    if new_quantity < 0 {
        tracing::warn!(
            product_id,
            quantity = current.quantity,
            delta = payload.delta,
            "inventory adjustment rejected"
        );
        return Err(AppError::InsufficientStock {
            product_id,
            requested: payload.delta.saturating_neg(),
            available: current.quantity,
        });
    }

    let updated = write_quantity(&txn, product_id, new_quantity).await?;
    txn.commit().await?;

    tracing::info!(
        product_id,
        delta = payload.delta,
        quantity = updated.quantity,
        "inventory adjusted"
    );
    Ok(updated)
}

pub async fn list_low_stock(
    state: &AppState,
    query: LowStockQuery,
) -> AppResult<Paged<LowStockItem>> {
    let threshold = query.threshold.unwrap_or(5);
    let (page, limit, offset) = query.pagination.normalize();

    let finder = Inventories::find()
        .filter(Column::Quantity.lte(threshold))
        .order_by_asc(Column::Quantity)
        .order_by_asc(Column::ProductId);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .find_also_related(Products)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(inventory, product)| {
            product.map(|p| LowStockItem {
                product: Product::from(p),
                quantity: inventory.quantity,
            })
        })
        .collect();

    Ok(Paged::new(items, page, limit, total))
}

pub async fn delete_inventory(state: &AppState, product_id: i32) -> AppResult<()> {
    let result = Inventories::delete_by_id(product_id)
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("inventory"));
    }
    tracing::info!(product_id, "inventory deleted");
    Ok(())
}

/// Writes the quantity and refreshes `updated_at` from the database clock,
/// the same clock the column default uses.
async fn write_quantity<C>(conn: &C, product_id: i32, quantity: i32) -> AppResult<Inventory>
where
    C: ConnectionTrait,
{
    let rows = Inventories::update_many()
        .col_expr(Column::Quantity, Expr::value(quantity))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::ProductId.eq(product_id))
        .exec_with_returning(conn)
        .await?;
    match rows.into_iter().next() {
        Some(row) => Ok(row.into()),
        None => Err(AppError::NotFound("inventory")),
    }
}
