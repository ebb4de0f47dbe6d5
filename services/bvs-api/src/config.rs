//! Configuration for the BVS API service.

use bvs_auth_core::config::parse_ttl;
use bvs_auth_core::AuthConfig;
use std::time::Duration;

/// BVS API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub port: u16,

    /// Database URL
    pub database_url: String,

    /// Maximum pooled database connections
    pub db_max_connections: u32,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Deployment environment (`development`, `production`, ...)
    pub app_env: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DB_MAX_CONNECTIONS"))?;

        // Server
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Access tokens (secret is mandatory)
        let jwt_secret = lookup("JWT_ACCESS_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_ACCESS_SECRET"))?;

        let access_token_ttl = parse_ttl(&lookup("ACCESS_TOKEN_TTL").unwrap_or_else(|| "1d".to_string()))
            .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_TTL"))?;

        let bcrypt_cost: u32 = lookup("BCRYPT_COST")
            .unwrap_or_else(|| "12".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("BCRYPT_COST"))?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid("BCRYPT_COST"));
        }

        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        // Build auth config
        let auth = AuthConfig::try_new(jwt_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_token_ttl(access_token_ttl)
            .with_bcrypt_cost(bcrypt_cost);

        Ok(Self {
            port,
            database_url,
            db_max_connections,
            auth,
            request_timeout: Duration::from_secs(request_timeout_secs),
            app_env,
        })
    }

    /// JSON logs in production, pretty logs elsewhere
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
