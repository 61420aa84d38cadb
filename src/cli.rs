//! Command-line surface of the `order-store` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the order store", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the tables, columns and relationships
    Schema {
        /// Only describe this table
        table: Option<String>,
    },

    /// Run a single read-only SELECT and print the rows as JSON
    Query {
        /// The statement; markdown code fences are stripped
        sql: String,
    },

    /// Show an order with its items and total
    Order { id: i32 },

    /// Most recent orders placed by a user
    RecentOrders {
        #[arg(long)]
        user_id: i32,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Most expensive products
    TopProducts {
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Products with the highest total sales
    TopSales {
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Users with the most orders
    TopCustomers {
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Products whose stock is at or below a threshold
    LowStock {
        #[arg(long)]
        threshold: Option<i32>,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },
}
