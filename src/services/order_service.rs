use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        Paged,
        orders::{CreateOrderRequest, OrderWithItems, PlaceOrderRequest, UpdateOrderStatusRequest},
    },
    entity::{
        inventories::{Column as InvCol, Entity as Inventories},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    params::{OrderListQuery, SortOrder},
    state::AppState,
    validation::{validate_order_lines, validate_status},
};

/// Inserts a bare order. A missing status leaves the column default
/// ("pending") in place.
pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> AppResult<Order> {
    let status = match payload.status {
        Some(s) => Set(Some(validate_status(&s)?)),
        None => NotSet,
    };

    let order = OrderActive {
        id: NotSet,
        user_id: Set(payload.user_id),
        order_date: NotSet,
        status,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(order_id = order.id, user_id = ?order.user_id, "order created");
    Ok(order.into())
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<OrderWithItems> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("order")),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(OrderWithItems::new(order.into(), items))
}

pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<Paged<Order>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();
    if let Some(user_id) = query.user_id {
        condition = condition.add(OrderCol::UserId.eq(user_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder
            .order_by_asc(OrderCol::OrderDate)
            .order_by_asc(OrderCol::Id),
        SortOrder::Desc => finder
            .order_by_desc(OrderCol::OrderDate)
            .order_by_desc(OrderCol::Id),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(Paged::new(orders, page, limit, total))
}

/// Sets the status to any short string; the set of statuses is not closed.
pub async fn update_order_status(
    state: &AppState,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    let status = validate_status(&payload.status)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound("order")),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(Some(status));
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = order.id, status = ?order.status, "order status updated");
    Ok(order.into())
}

/// Deletes the order; its items go with it through the cascade.
pub async fn delete_order(state: &AppState, id: i32) -> AppResult<()> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("order"));
    }
    tracing::info!(order_id = id, "order deleted");
    Ok(())
}

/// Places an order atomically: the order row, one item per line carrying
/// the product's current price, and the matching stock decrements either
/// all land or none do.
pub async fn place_order(state: &AppState, payload: PlaceOrderRequest) -> AppResult<OrderWithItems> {
    let lines = validate_order_lines(&payload.items)?;
    let status = payload.status.as_deref().map(validate_status).transpose()?;
    let product_ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();

    let txn = state.orm.begin().await?;

    if let Some(user_id) = payload.user_id {
        if Users::find_by_id(user_id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound("user"));
        }
    }

    // Lock in ascending product id so concurrent placements cannot deadlock.
    let stock: HashMap<i32, i32> = Inventories::find()
        .filter(InvCol::ProductId.is_in(product_ids.clone()))
        .order_by_asc(InvCol::ProductId)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|inv| (inv.product_id, inv.quantity))
        .collect();

    let prices: HashMap<i32, Decimal> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p.price))
        .collect();

    let mut priced = Vec::with_capacity(lines.len());
    for line in &lines {
        let price = match prices.get(&line.product_id) {
            Some(price) => *price,
            None => return Err(AppError::NotFound("product")),
        };
        // No inventory row means nothing in stock.
        let available = stock.get(&line.product_id).copied().unwrap_or(0);
        if available < line.quantity {
            tracing::warn!(
                product_id = line.product_id,
                requested = line.quantity,
                available,
                "order rejected: insufficient stock"
            );
            return Err(AppError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available,
            });
        }
        priced.push((line, price));
    }

    let order = OrderActive {
        id: NotSet,
        user_id: Set(payload.user_id),
        order_date: NotSet,
        status: match status {
            Some(s) => Set(Some(s)),
            None => NotSet,
        },
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(priced.len());
    for (line, price) in priced {
        let item = OrderItemActive {
            id: NotSet,
            order_id: Set(Some(order.id)),
            product_id: Set(Some(line.product_id)),
            quantity: Set(line.quantity),
            price: Set(price),
        }
        .insert(&txn)
        .await?;
        items.push(item.into());

        Inventories::update_many()
            .col_expr(InvCol::Quantity, Expr::col(InvCol::Quantity).sub(line.quantity))
            .col_expr(InvCol::UpdatedAt, Expr::current_timestamp().into())
            .filter(InvCol::ProductId.eq(line.product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    let placed = OrderWithItems::new(order.into(), items);
    tracing::info!(
        order_id = placed.order.id,
        user_id = ?placed.order.user_id,
        lines = placed.items.len(),
        total = %placed.total,
        "order placed"
    );
    Ok(placed)
}
