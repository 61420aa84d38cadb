//! Gatekeeper for ad-hoc SQL: only a single SELECT statement gets through.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(INSERT|UPDATE|DELETE|DROP|ALTER|TRUNCATE|CREATE)\b")
        .expect("forbidden keyword pattern")
});

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^```(?:sql)?\s*|\s*```$").expect("code fence pattern")
});

/// Removes markdown code fences around a statement.
pub fn strip_code_fences(sql: &str) -> String {
    CODE_FENCE.replace_all(sql.trim(), "").into_owned()
}

/// Normalises `sql` and returns it if it is a single read-only SELECT.
pub fn clean_and_validate(sql: &str) -> AppResult<String> {
    let stripped = strip_code_fences(sql);
    let sql = stripped.trim().trim_end_matches(';').trim();

    let starts_with_select = sql
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"));
    if !starts_with_select {
        let preview: String = sql.chars().take(40).collect();
        return Err(AppError::BadRequest(format!(
            "Only SELECT queries are allowed. Got: {preview}..."
        )));
    }

    if let Some(found) = FORBIDDEN.find(sql) {
        return Err(AppError::BadRequest(format!(
            "Detected forbidden SQL keyword {}",
            found.as_str().to_uppercase()
        )));
    }

    if sql.contains(';') {
        return Err(AppError::BadRequest(
            "Multiple statements are not allowed.".into(),
        ));
    }

    Ok(sql.to_string())
}
