use serde_json::Value;

use crate::{
    dto::reports::QueryResult,
    error::AppResult,
    sql_guard::clean_and_validate,
    state::AppState,
};

/// Runs an ad-hoc SELECT and returns its rows as JSON objects.
///
/// The statement must pass the guard first; it then runs inside a
/// `READ ONLY` transaction with a statement timeout, so anything that slips
/// past the keyword check still cannot write. The transaction is always
/// rolled back.
pub async fn run_read_only(state: &AppState, raw_sql: &str) -> AppResult<QueryResult> {
    let sql = clean_and_validate(raw_sql)?;
    let row_limit = state.limits.row_limit;

    let mut tx = state.pool.begin().await?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await?;
    let timeout = format!("SET LOCAL statement_timeout = {}", state.limits.timeout_ms);
    sqlx::query(&timeout).execute(&mut *tx).await?;

    // One extra row tells us whether the result was cut off. The newline
    // keeps a trailing `--` comment from swallowing the closing paren.
    let wrapped = format!(
        "SELECT COALESCE(json_agg(q), '[]'::json) FROM (SELECT * FROM ({sql}\n) AS inner_q LIMIT {}) AS q",
        row_limit + 1
    );
    let result: Value = sqlx::query_scalar(&wrapped).fetch_one(&mut *tx).await?;
    tx.rollback().await?;

    let mut rows = match result {
        Value::Array(rows) => rows,
        other => vec![other],
    };
    let truncated = rows.len() > row_limit;
    rows.truncate(row_limit);

    tracing::debug!(rows = rows.len(), truncated, "read-only query executed");
    Ok(QueryResult {
        sql,
        rows,
        truncated,
    })
}
