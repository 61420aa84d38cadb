//! Input checks applied before a statement reaches the database, mirroring
//! the column limits of the schema.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::{
    dto::orders::OrderLine,
    error::{AppError, AppResult},
    models::KNOWN_ORDER_STATUSES,
};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;
pub const STATUS_MAX_LEN: usize = 20;

/// NUMERIC(10,2): eight integer digits, two fractional.
const PRICE_SCALE: u32 = 2;
// 99999999.99, i.e. the mantissa 9_999_999_999 split into lo/mid words.
const PRICE_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

pub fn validate_name(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {NAME_MAX_LEN} characters"
        )));
    }
    if !KNOWN_ORDER_STATUSES.contains(&value) {
        tracing::debug!(status = value, "status outside the known set");
    }
    Ok(value.to_string())
}

pub fn validate_email(value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest("email must not be empty".into()));
    }
    if value.chars().count() > EMAIL_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "email must be at most {EMAIL_MAX_LEN} characters"
        )));
    }
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::BadRequest(format!("invalid email {value}"))),
    }
}

pub fn validate_status(value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest("status must not be empty".into()));
    }
    if value.chars().count() > STATUS_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "status must be at most {STATUS_MAX_LEN} characters"
        )));
    }
    if !KNOWN_ORDER_STATUSES.contains(&value) {
        tracing::debug!(status = value, "status outside the known set");
    }
    Ok(value.to_string())
}

/// Returns the price rescaled to exactly two decimal places.
pub fn validate_price(price: Decimal) -> AppResult<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    let normalized = price.normalize();
    if normalized.scale() > PRICE_SCALE {
        return Err(AppError::BadRequest(format!(
            "price {price} has more than {PRICE_SCALE} decimal places"
        )));
    }
    if normalized > PRICE_MAX {
        return Err(AppError::BadRequest(format!(
            "price must be at most {PRICE_MAX}"
        )));
    }
    let mut price = normalized.abs();
    price.rescale(PRICE_SCALE);
    Ok(price)
}

pub fn validate_stock_quantity(quantity: i32) -> AppResult<i32> {
    if quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".into()));
    }
    Ok(quantity)
}

pub fn validate_line_quantity(quantity: i32) -> AppResult<i32> {
    if quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be positive".into()));
    }
    Ok(quantity)
}

/// Checks the lines of an order and returns them sorted by product id, the
/// order in which inventory rows get locked.
pub fn validate_order_lines(lines: &[OrderLine]) -> AppResult<Vec<OrderLine>> {
    if lines.is_empty() {
        return Err(AppError::BadRequest("order must contain at least one item".into()));
    }
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        validate_line_quantity(line.quantity)?;
        if !seen.insert(line.product_id) {
            return Err(AppError::BadRequest(format!(
                "product {} appears more than once",
                line.product_id
            )));
        }
    }
    let mut sorted = lines.to_vec();
    sorted.sort_by_key(|line| line.product_id);
    Ok(sorted)
}
