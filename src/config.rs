use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub query_timeout_ms: u64,
    pub query_row_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unparsable optional
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);
        let query_timeout_ms = lookup("QUERY_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(5_000);
        let query_row_limit = lookup("QUERY_ROW_LIMIT")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(500);
        Ok(Self {
            database_url,
            max_connections,
            query_timeout_ms,
            query_row_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/shop")]))
                .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/shop");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.query_timeout_ms, 5_000);
        assert_eq!(config.query_row_limit, 500);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_and_garbage_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("QUERY_TIMEOUT_MS", "250"),
            ("QUERY_ROW_LIMIT", "lots"),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.query_timeout_ms, 250);
        assert_eq!(config.query_row_limit, 500);
    }

    #[test]
    fn zero_timeout_keeps_the_default() {
        // statement_timeout = 0 would disable the limit altogether.
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/shop"),
            ("QUERY_TIMEOUT_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.query_timeout_ms, 5_000);
    }
}
