use order_store::{
    config::AppConfig,
    db::run_migrations,
    dto::{
        orders::{OrderLine, PlaceOrderRequest},
        products::CreateProductRequest,
        users::CreateUserRequest,
    },
    params::ProductQuery,
    services::{order_service, product_service, report_service, user_service},
    state::AppState,
    telemetry::init_tracing,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;
    let state = AppState::connect(&config).await?;
    // Ensure migrations are applied.
    run_migrations(&state.orm).await?;

    let alice_id = ensure_user(&state, "Alice", "alice@example.com").await?;
    let bob_id = ensure_user(&state, "Bob", "bob@example.com").await?;
    let product_ids = seed_products(&state).await?;

    // Only the first run places the sample order.
    if report_service::recent_orders_for_user(&state.pool, alice_id, Some(1))
        .await?
        .is_empty()
    {
        let placed = order_service::place_order(
            &state,
            PlaceOrderRequest {
                user_id: Some(alice_id),
                status: None,
                items: vec![OrderLine {
                    product_id: product_ids[0],
                    quantity: 2,
                }],
            },
        )
        .await?;
        tracing::info!(order_id = placed.order.id, total = %placed.total, "sample order placed");
    }

    tracing::info!(alice_id, bob_id, "seed completed");
    Ok(())
}

async fn ensure_user(state: &AppState, name: &str, email: &str) -> anyhow::Result<i32> {
    if let Some(existing) = user_service::find_user_by_email(state, email).await? {
        return Ok(existing.id);
    }
    let user = user_service::create_user(
        state,
        CreateUserRequest {
            name: name.into(),
            email: email.into(),
        },
    )
    .await?;
    Ok(user.id)
}

async fn seed_products(state: &AppState) -> anyhow::Result<Vec<i32>> {
    let products = [
        ("Widget", "A dependable widget", Decimal::new(999, 2), 10),
        ("Gadget", "Does gadget things", Decimal::new(2450, 2), 5),
        ("Gizmo", "Small and shiny", Decimal::new(375, 2), 100),
    ];

    let mut ids = Vec::with_capacity(products.len());
    for (name, desc, price, stock) in products {
        let existing = product_service::list_products(
            state,
            ProductQuery {
                q: Some(name.into()),
                ..Default::default()
            },
        )
        .await?
        .items
        .into_iter()
        .find(|p| p.name == name);

        let id = match existing {
            Some(p) => p.id,
            None => {
                product_service::create_product(
                    state,
                    CreateProductRequest {
                        name: name.into(),
                        description: Some(desc.into()),
                        price,
                        initial_quantity: Some(stock),
                    },
                )
                .await?
                .id
            }
        };
        ids.push(id);
    }

    tracing::info!(count = ids.len(), "products seeded");
    Ok(ids)
}
