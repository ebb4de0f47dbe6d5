//! Auth errors

use thiserror::Error;

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed input, rejected before touching the store
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Wrong email or password. Deliberately says nothing about which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or otherwise unverifiable token
    #[error("invalid token")]
    InvalidToken,

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Target record absent
    #[error("{0}")]
    NotFound(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidCredentials | Self::InvalidToken => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Configuration(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for errors that must surface as an opaque server fault
    pub fn is_fatal(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::InvalidToken => "Unauthorized".to_string(),
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Configuration(_) | Self::Database(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<bvs_db::DbError> for AuthError {
    fn from(err: bvs_db::DbError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::Database(err.to_string())
    }
}
