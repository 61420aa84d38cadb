use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::{
        Paged,
        products::{CreateProductRequest, UpdateProductRequest},
    },
    entity::{
        inventories::ActiveModel as InventoryActive,
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    models::Product,
    params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
    validation::{validate_name, validate_price, validate_stock_quantity},
};

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<Paged<Product>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    // Stable paging when the sort column ties.
    finder = finder.order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(Paged::new(items, page, limit, total))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<Product> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from);
    match result {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound("product")),
    }
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let name = validate_name("name", &payload.name)?;
    let price = validate_price(payload.price)?;
    let initial_quantity = payload
        .initial_quantity
        .map(validate_stock_quantity)
        .transpose()?;

    let txn = state.orm.begin().await?;

    let product = ActiveModel {
        id: NotSet,
        name: Set(name),
        description: Set(payload.description),
        price: Set(price),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    if let Some(quantity) = initial_quantity {
        InventoryActive {
            product_id: Set(product.id),
            quantity: Set(quantity),
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!(
        product_id = product.id,
        stocked = initial_quantity.is_some(),
        "product created"
    );
    Ok(product.into())
}

pub async fn update_product(
    state: &AppState,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound("product")),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validate_name("name", &name)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(validate_price(price)?);
    }

    let product = active.update(&state.orm).await?;
    tracing::info!(product_id = product.id, "product updated");
    Ok(product.into())
}

/// Deletes the product together with its inventory row and every order
/// line referencing it (cascading foreign keys).
pub async fn delete_product(state: &AppState, id: i32) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("product"));
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}
