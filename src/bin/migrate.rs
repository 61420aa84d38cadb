use order_store::{config::AppConfig, db::run_migrations, state::AppState, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = AppConfig::from_env()?;
    let state = AppState::connect(&config).await?;
    run_migrations(&state.orm).await?;
    tracing::info!("migrations applied");
    Ok(())
}
