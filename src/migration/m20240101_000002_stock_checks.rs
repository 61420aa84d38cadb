use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

const CHECKS: [(&str, &str, &str); 4] = [
    (
        "inventories",
        "chk_inventories_quantity_non_negative",
        "quantity >= 0",
    ),
    ("products", "chk_products_price_non_negative", "price >= 0"),
    (
        "order_items",
        "chk_order_items_quantity_positive",
        "quantity > 0",
    ),
    (
        "order_items",
        "chk_order_items_price_non_negative",
        "price >= 0",
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (table, name, predicate) in CHECKS {
            db.execute_unprepared(&format!(
                "ALTER TABLE {table} ADD CONSTRAINT {name} CHECK ({predicate})"
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for (table, name, _) in CHECKS.iter().rev() {
            db.execute_unprepared(&format!(
                "ALTER TABLE {table} DROP CONSTRAINT IF EXISTS {name}"
            ))
            .await?;
        }
        Ok(())
    }
}
