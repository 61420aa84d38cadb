#![allow(dead_code)]

use order_store::{
    db::{create_pool, run_migrations},
    dto::{
        products::CreateProductRequest,
        users::CreateUserRequest,
    },
    models::{Product, User},
    services::{product_service, user_service},
    state::{AppState, QueryLimits},
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

static MIGRATED: Mutex<bool> = Mutex::const_new(false);

/// Connects to the test database, or returns `None` so the caller can skip
/// when no database is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run database tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    let state = AppState::from_pool(pool, QueryLimits::default());

    let mut migrated = MIGRATED.lock().await;
    if !*migrated {
        run_migrations(&state.orm).await?;
        *migrated = true;
    }

    Ok(Some(state))
}

/// Emails must be unique across runs against the same database.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", Uuid::new_v4().simple())
}

pub async fn create_user(state: &AppState, name: &str) -> anyhow::Result<User> {
    let user = user_service::create_user(
        state,
        CreateUserRequest {
            name: name.into(),
            email: unique_email(&name.to_lowercase()),
        },
    )
    .await?;
    Ok(user)
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: &str,
    stock: Option<i32>,
) -> anyhow::Result<Product> {
    let product = product_service::create_product(
        state,
        CreateProductRequest {
            name: name.into(),
            description: None,
            price: price.parse::<Decimal>()?,
            initial_quantity: stock,
        },
    )
    .await?;
    Ok(product)
}
