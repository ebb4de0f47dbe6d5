//! Auth service - ties together password hashing, token issuance and
//! session resolution over the user and access repositories

use std::sync::Arc;

use bvs_db::{AccessRepository, CreateUser, DbError, UserRepository};
use bvs_types::{MembershipSummary, PublicUser, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    access::{self, Identity},
    config::AuthConfig,
    password::PasswordHasher,
    session::SessionResolver,
    token::TokenCodec,
    validation, AuthError,
};

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful register/login result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

/// Live access state, read from the store rather than the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    pub is_bvs_admin: bool,
    pub memberships: Vec<MembershipSummary>,
}

/// `/auth/me` payload
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user: PublicUser,
    pub access: AccessSummary,
}

/// Authentication service
///
/// Provides unified interface for:
/// - Registration and login (bcrypt + HS256 access tokens)
/// - Bearer token resolution
/// - Live identity lookup
pub struct AuthService<U: UserRepository, A: AccessRepository> {
    hasher: PasswordHasher,
    codec: TokenCodec,
    resolver: SessionResolver,
    user_repo: Arc<U>,
    access_repo: Arc<A>,
}

impl<U: UserRepository, A: AccessRepository> AuthService<U, A> {
    /// Create a new auth service
    pub fn new(config: &AuthConfig, user_repo: Arc<U>, access_repo: Arc<A>) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        Self::with_hasher(config, hasher, user_repo, access_repo)
    }

    /// Create a service sharing an existing hasher
    pub fn with_hasher(
        config: &AuthConfig,
        hasher: PasswordHasher,
        user_repo: Arc<U>,
        access_repo: Arc<A>,
    ) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(config)?;
        Ok(Self {
            hasher,
            resolver: SessionResolver::new(codec.clone()),
            codec,
            user_repo,
            access_repo,
        })
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Resolve an `Authorization` header value
    pub fn resolve_bearer(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        self.resolver.resolve(header)
    }

    // =========================================================================
    // Registration / Login
    // =========================================================================

    /// Register a new account and issue a token
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        validation::validate_email(&input.email)?;
        validation::validate_password(&input.password)?;
        validation::validate_profile(
            input.first_name.as_deref(),
            input.last_name.as_deref(),
            input.avatar_url.as_deref(),
        )?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(email_conflict());
        }

        let password_hash = self.hasher.hash_async(input.password).await?;

        let create = CreateUser {
            id: Uuid::new_v4(),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            avatar_url: input.avatar_url,
            password_hash,
        };

        // Another request may have taken the email since the lookup
        let user = self.user_repo.create(create).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => email_conflict(),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.start_session(user.user_id(), user.to_public()).await
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown email, missing hash and wrong password all fail the same way.
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        validation::validate_email(&input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let user = self.user_repo.find_by_email(&input.email).await?;

        let verified = match user.as_ref().and_then(|u| u.password_hash.clone()) {
            Some(hash) => self.hasher.verify_async(input.password, hash).await,
            None => self.hasher.verify_dummy_async(input.password).await,
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::debug!("Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        tracing::info!(user_id = %user.id, "User logged in");
        self.start_session(user.user_id(), user.to_public()).await
    }

    /// Snapshot roles and memberships into a fresh token
    async fn start_session(&self, user_id: UserId, user: PublicUser) -> Result<AuthSession, AuthError> {
        let roles = self.access_repo.list_roles_for_user(user_id.0).await?;
        let memberships = load_memberships(self.access_repo.as_ref(), user_id).await?;

        let issued = self.codec.issue(user_id, roles, memberships)?;

        Ok(AuthSession {
            access_token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Current user with live access state. `None` if the account is gone.
    pub async fn current_user(&self, user_id: UserId) -> Result<Option<CurrentUser>, AuthError> {
        let Some(user) = self.user_repo.find_by_id(user_id.0).await? else {
            return Ok(None);
        };

        let roles = self.access_repo.list_roles_for_user(user_id.0).await?;
        let memberships = load_memberships(self.access_repo.as_ref(), user_id).await?;

        Ok(Some(CurrentUser {
            user: user.to_public(),
            access: AccessSummary {
                is_bvs_admin: access::has_admin_role(&roles),
                memberships,
            },
        }))
    }
}

impl<U: UserRepository, A: AccessRepository> std::fmt::Debug for AuthService<U, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

pub(crate) fn email_conflict() -> AuthError {
    AuthError::Conflict("Email already exists".to_string())
}

/// Memberships for one user, primary first
pub(crate) async fn load_memberships<A: AccessRepository + ?Sized>(
    access_repo: &A,
    user_id: UserId,
) -> Result<Vec<MembershipSummary>, AuthError> {
    let rows = access_repo.list_memberships_for_user(user_id.0).await?;
    Ok(rows.iter().filter_map(|row| row.summary()).collect())
}
