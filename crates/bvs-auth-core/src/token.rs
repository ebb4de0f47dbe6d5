//! Access token issuance and verification (HS256 JWT)
//!
//! Tokens embed a snapshot of the subject's roles and memberships taken at
//! issue time. The snapshot is never refreshed; the token lifetime is the
//! bound on how stale it can get.

use bvs_types::{MembershipSummary, UserId};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthConfig, AuthError};

/// The single accepted signing algorithm
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Global role names
    #[serde(default)]
    pub roles: Vec<String>,
    /// Membership snapshot, primary first
    #[serde(default)]
    pub memberships: Vec<MembershipSummary>,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
    /// Random nonce, distinct per issued token
    #[serde(default)]
    pub jti: String,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with a symmetric secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: ChronoDuration,
}

impl TokenCodec {
    /// Create a codec from config.
    ///
    /// Fails if the secret is empty or the ttl is out of range.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::Configuration(
                "JWT access secret must not be empty".to_string(),
            ));
        }

        let ttl = ChronoDuration::from_std(config.access_token_ttl).map_err(|_| {
            AuthError::Configuration("access token ttl out of range".to_string())
        })?;
        if ttl <= ChronoDuration::zero() {
            return Err(AuthError::Configuration(
                "access token ttl must be positive".to_string(),
            ));
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let secret = config.jwt_secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Token lifetime
    pub fn ttl(&self) -> ChronoDuration {
        self.ttl
    }

    /// Issue a token valid from now
    pub fn issue(
        &self,
        user_id: UserId,
        roles: Vec<String>,
        memberships: Vec<MembershipSummary>,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, roles, memberships, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn issue_at(
        &self,
        user_id: UserId,
        roles: Vec<String>,
        memberships: Vec<MembershipSummary>,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let iat = issued_at.timestamp();
        let exp = iat + self.ttl.num_seconds();

        let claims = AccessClaims {
            sub: user_id.to_string(),
            roles,
            memberships,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.sign(&claims)?;
        let expires_at = Utc.timestamp_opt(exp, 0).single().ok_or_else(|| {
            AuthError::Internal("token expiry out of range".to_string())
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Sign an arbitrary claim set
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign access token: {}", e);
            AuthError::Internal("Failed to issue token".to_string())
        })
    }

    /// Verify signature, algorithm and expiry, and return the claims.
    ///
    /// Every failure is [`AuthError::InvalidToken`]; the reason is only logged.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                tracing::debug!("Token validation failed: {:?}", e.kind());
                AuthError::InvalidToken
            },
        )?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
