use std::fmt;

use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

/// Integrity rule a statement broke, derived from the Postgres SQLSTATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    NotNull,
    ForeignKey,
    Check,
}

impl ConstraintKind {
    pub fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Unique),
            "23502" => Some(Self::NotNull),
            "23503" => Some(Self::ForeignKey),
            "23514" => Some(Self::Check),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::NotNull => "not-null",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub constraint: Option<String>,
    pub message: String,
}

impl ConstraintViolation {
    pub fn from_sqlx(err: &sqlx::Error) -> Option<Self> {
        let db_err = err.as_database_error()?;
        let code = db_err.code()?;
        let kind = ConstraintKind::from_sqlstate(&code)?;
        Some(Self {
            kind,
            constraint: db_err.constraint().map(str::to_owned),
            message: db_err.message().to_owned(),
        })
    }

    pub fn from_db_err(err: &DbErr) -> Option<Self> {
        match err {
            DbErr::Exec(RuntimeErr::SqlxError(e))
            | DbErr::Query(RuntimeErr::SqlxError(e))
            | DbErr::Conn(RuntimeErr::SqlxError(e)) => Self::from_sqlx(e),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(name) => write!(f, "{} violation on {}: {}", self.kind, name, self.message),
            None => write!(f, "{} violation: {}", self.kind, self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{0}")]
    Constraint(ConstraintViolation),

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Database error: {0}")]
    DbError(sqlx::Error),

    #[error("ORM error: {0}")]
    OrmError(DbErr),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The constraint class behind this error, if it came from one.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            AppError::Constraint(violation) => Some(violation.kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(violation) = ConstraintViolation::from_sqlx(&err) {
            return AppError::Constraint(violation);
        }
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("row"),
            other => AppError::DbError(other),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(violation) = ConstraintViolation::from_db_err(&err) {
            return AppError::Constraint(violation);
        }
        match err {
            DbErr::RecordNotFound(_) => AppError::NotFound("record"),
            other => AppError::OrmError(other),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
