//! Static description of the relational layout, used for documentation output.

use std::fmt::Write;

pub struct ColumnInfo {
    pub name: &'static str,
    pub definition: &'static str,
}

pub struct TableInfo {
    pub name: &'static str,
    pub columns: &'static [ColumnInfo],
    pub constraints: &'static [&'static str],
}

const fn col(name: &'static str, definition: &'static str) -> ColumnInfo {
    ColumnInfo { name, definition }
}

/// Tables in creation order: every table comes after the tables it references.
pub static TABLES: [TableInfo; 5] = [
    TableInfo {
        name: "users",
        columns: &[
            col("id", "SERIAL PRIMARY KEY"),
            col("name", "VARCHAR(100) NOT NULL"),
            col("email", "VARCHAR(100) UNIQUE NOT NULL"),
            col("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &[],
    },
    TableInfo {
        name: "products",
        columns: &[
            col("id", "SERIAL PRIMARY KEY"),
            col("name", "VARCHAR(100) NOT NULL"),
            col("description", "TEXT"),
            col("price", "NUMERIC(10,2) NOT NULL"),
            col("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &["CHECK (price >= 0)"],
    },
    TableInfo {
        name: "inventories",
        columns: &[
            col(
                "product_id",
                "INT PRIMARY KEY REFERENCES products(id) ON DELETE CASCADE",
            ),
            col("quantity", "INT NOT NULL DEFAULT 0"),
            col("updated_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
        ],
        constraints: &["CHECK (quantity >= 0)"],
    },
    TableInfo {
        name: "orders",
        columns: &[
            col("id", "SERIAL PRIMARY KEY"),
            col("user_id", "INT REFERENCES users(id) ON DELETE CASCADE"),
            col("order_date", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
            col("status", "VARCHAR(20) DEFAULT 'pending'"),
        ],
        constraints: &[],
    },
    TableInfo {
        name: "order_items",
        columns: &[
            col("id", "SERIAL PRIMARY KEY"),
            col(
                "order_id",
                "INT REFERENCES orders(id) ON DELETE CASCADE",
            ),
            col(
                "product_id",
                "INT REFERENCES products(id) ON DELETE CASCADE",
            ),
            col("quantity", "INT NOT NULL"),
            col("price", "NUMERIC(10,2) NOT NULL"),
        ],
        constraints: &[
            "UNIQUE (order_id, product_id)",
            "CHECK (quantity > 0)",
            "CHECK (price >= 0)",
        ],
    },
];

pub const RELATIONSHIPS: [&str; 4] = [
    "orders.user_id -> users.id",
    "order_items.order_id -> orders.id",
    "order_items.product_id -> products.id",
    "inventories.product_id -> products.id",
];

pub fn table(name: &str) -> Option<&'static TableInfo> {
    TABLES.iter().find(|t| t.name == name)
}

fn render_table(out: &mut String, table: &TableInfo) {
    let _ = writeln!(out, "Table: {}", table.name);
    for column in table.columns {
        let _ = writeln!(out, "- {} {}", column.name, column.definition);
    }
    for constraint in table.constraints {
        let _ = writeln!(out, "- {constraint}");
    }
}

/// Rendering of a single table, or `None` if no table has that name.
pub fn describe_table(name: &str) -> Option<String> {
    let table = table(name)?;
    let mut out = String::new();
    render_table(&mut out, table);
    Some(out)
}

/// Human-readable rendering of every table and relationship.
pub fn describe() -> String {
    let mut out = String::new();
    for table in &TABLES {
        render_table(&mut out, table);
        out.push('\n');
    }
    out.push_str("Relationships:\n");
    for rel in RELATIONSHIPS {
        let _ = writeln!(out, "- {rel}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_precede_children() {
        let position = |name: &str| TABLES.iter().position(|t| t.name == name).unwrap();
        for rel in RELATIONSHIPS {
            let (from, to) = rel.split_once(" -> ").unwrap();
            let child = from.split('.').next().unwrap();
            let parent = to.split('.').next().unwrap();
            assert!(position(parent) < position(child), "{rel}");
        }
    }

    #[test]
    fn describe_lists_every_table() {
        let text = describe();
        for t in &TABLES {
            assert!(text.contains(&format!("Table: {}", t.name)));
        }
        assert!(text.contains("- status VARCHAR(20) DEFAULT 'pending'"));
        assert!(text.contains("- UNIQUE (order_id, product_id)"));
        assert!(text.contains("- inventories.product_id -> products.id"));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(table("orders").map(|t| t.columns.len()), Some(4));
        assert!(table("carts").is_none());
    }

    #[test]
    fn single_table_rendering() {
        let text = describe_table("order_items").unwrap();
        assert!(text.starts_with("Table: order_items\n"));
        assert!(text.contains("- order_id INT REFERENCES orders(id) ON DELETE CASCADE"));
        assert!(!text.contains("Relationships:"));
        assert!(describe_table("carts").is_none());
    }
}
