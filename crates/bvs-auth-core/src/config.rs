//! Configuration types for the auth core

use std::time::Duration;

use crate::AuthError;

/// Secrets shorter than this are accepted but logged
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Default access token lifetime (1 day)
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest cost bcrypt accepts. Only for tests and local development.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Auth core configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    /// Access token lifetime, also the staleness bound for embedded claims
    pub access_token_ttl: Duration,
    /// bcrypt cost
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create a config with default ttl and cost.
    ///
    /// Fails with [`AuthError::Configuration`] if the secret is empty.
    pub fn try_new(jwt_secret: impl Into<String>) -> Result<Self, AuthError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(AuthError::Configuration(
                "JWT access secret must not be empty".to_string(),
            ));
        }
        if jwt_secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = jwt_secret.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "JWT access secret is shorter than recommended"
            );
        }

        Ok(Self {
            jwt_secret,
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        })
    }

    /// Set access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set bcrypt cost
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Parse a token lifetime such as `1d`, `12h`, `30m`, `45s` or a bare
/// number of seconds.
pub fn parse_ttl(value: &str) -> Result<Duration, AuthError> {
    let value = value.trim();
    let invalid = || AuthError::Configuration(format!("invalid token ttl: {value:?}"));

    let (digits, unit_secs) = match value.char_indices().last() {
        Some((idx, 'd')) => (&value[..idx], 24 * 60 * 60),
        Some((idx, 'h')) => (&value[..idx], 60 * 60),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 's')) => (&value[..idx], 1),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
