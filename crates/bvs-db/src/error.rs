//! Database errors

use thiserror::Error;

/// Database errors
///
/// Driver errors are classified on conversion so callers can react to
/// uniqueness and existence failures without inspecting SQL state codes.
#[derive(Error, Debug)]
pub enum DbError {
    /// A unique constraint rejected the write
    #[error("unique constraint violated")]
    UniqueViolation { constraint: Option<String> },

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Any other SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
}

impl DbError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::UniqueViolation {
                    constraint: db_err.constraint().map(str::to_string),
                }
            }
            other => Self::Sqlx(other),
        }
    }
}

/// Result type for repository operations
pub type DbResult<T> = Result<T, DbError>;
