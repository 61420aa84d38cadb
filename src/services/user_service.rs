use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    dto::{
        Paged,
        users::{CreateUserRequest, UpdateUserRequest},
    },
    entity::users::{ActiveModel, Column, Entity as Users},
    error::{AppError, AppResult},
    models::User,
    params::Pagination,
    state::AppState,
    validation::{validate_email, validate_name},
};

pub async fn create_user(state: &AppState, payload: CreateUserRequest) -> AppResult<User> {
    let name = validate_name("name", &payload.name)?;
    let email = validate_email(&payload.email)?;

    let user = ActiveModel {
        id: NotSet,
        name: Set(name),
        email: Set(email),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = user.id, "user created");
    Ok(user.into())
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<User> {
    let user = Users::find_by_id(id).one(&state.orm).await?;
    match user {
        Some(u) => Ok(u.into()),
        None => Err(AppError::NotFound("user")),
    }
}

pub async fn find_user_by_email(state: &AppState, email: &str) -> AppResult<Option<User>> {
    let user = Users::find()
        .filter(Column::Email.eq(email.trim()))
        .one(&state.orm)
        .await?;
    Ok(user.map(User::from))
}

pub async fn list_users(state: &AppState, pagination: Pagination) -> AppResult<Paged<User>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Users::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(Paged::new(items, page, limit, total))
}

pub async fn update_user(
    state: &AppState,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<User> {
    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound("user")),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(validate_name("name", &name)?);
    }
    if let Some(email) = payload.email {
        active.email = Set(validate_email(&email)?);
    }

    let user = active.update(&state.orm).await?;
    tracing::info!(user_id = user.id, "user updated");
    Ok(user.into())
}

/// Deletes the user; the database removes their orders (and those orders'
/// items) through the cascading foreign keys.
pub async fn delete_user(state: &AppState, id: i32) -> AppResult<()> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("user"));
    }
    tracing::info!(user_id = id, "user deleted");
    Ok(())
}
