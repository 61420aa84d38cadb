use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Columns that only carry a default; NULL is a legal value for each.
const OPTIONAL: [(&str, &str); 7] = [
    ("users", "created_at"),
    ("products", "created_at"),
    ("inventories", "updated_at"),
    ("orders", "order_date"),
    ("orders", "status"),
    ("order_items", "order_id"),
    ("order_items", "product_id"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (table, column) in OPTIONAL {
            db.execute_unprepared(&format!(
                "ALTER TABLE {table} ALTER COLUMN {column} DROP NOT NULL"
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (table, column) in OPTIONAL.iter().rev() {
            db.execute_unprepared(&format!(
                "ALTER TABLE {table} ALTER COLUMN {column} SET NOT NULL"
            ))
            .await?;
        }
        Ok(())
    }
}
