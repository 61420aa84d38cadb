use clap::Parser;
use serde::Serialize;

use order_store::{
    config::AppConfig,
    params::{LowStockQuery, Pagination},
    schema,
    services::{inventory_service, order_service, query_service, report_service},
    state::AppState,
    telemetry::init_tracing,
};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    // Describing the schema needs no database.
    if let Command::Schema { table } = &args.command {
        return print_schema(table.as_deref());
    }

    let config = AppConfig::from_env()?;
    let state = AppState::connect(&config).await?;
    run(args.command, &state).await
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    match command {
        Command::Schema { table } => print_schema(table.as_deref()),
        Command::Query { sql } => print_json(&query_service::run_read_only(state, &sql).await?),
        Command::Order { id } => print_json(&order_service::get_order(state, id).await?),
        Command::RecentOrders { user_id, limit } => print_json(
            &report_service::recent_orders_for_user(&state.pool, user_id, limit).await?,
        ),
        Command::TopProducts { limit } => {
            print_json(&report_service::top_products_by_price(&state.pool, limit).await?)
        }
        Command::TopSales { limit } => {
            print_json(&report_service::top_selling_products(&state.pool, limit).await?)
        }
        Command::TopCustomers { limit } => {
            print_json(&report_service::top_customers(&state.pool, limit).await?)
        }
        Command::LowStock {
            threshold,
            page,
            per_page,
        } => print_json(
            &inventory_service::list_low_stock(
                state,
                LowStockQuery {
                    pagination: Pagination { page, per_page },
                    threshold,
                },
            )
            .await?,
        ),
    }
}

fn print_schema(table: Option<&str>) -> anyhow::Result<()> {
    match table {
        None => print!("{}", schema::describe()),
        Some(name) => match schema::describe_table(name) {
            Some(text) => print!("{text}"),
            None => anyhow::bail!("unknown table: {name}"),
        },
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
