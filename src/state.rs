use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, create_orm_conn, create_pool},
};

/// Bounds applied to ad-hoc read-only queries.
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub timeout_ms: u64,
    pub row_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            row_limit: 500,
        }
    }
}

impl From<&AppConfig> for QueryLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_ms: config.query_timeout_ms,
            row_limit: config.query_row_limit,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub limits: QueryLimits,
}

impl AppState {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database_url, config.max_connections).await?;
        Ok(Self::from_pool(pool, QueryLimits::from(config)))
    }

    pub fn from_pool(pool: DbPool, limits: QueryLimits) -> Self {
        let orm = create_orm_conn(&pool);
        Self { pool, orm, limits }
    }
}
