//! Application state

use std::ops::Deref;
use std::sync::Arc;

use bvs_auth_core::{AuthError, AuthService, PasswordHasher, UserService};
use bvs_db::pg::{PgAccessRepository, PgUserRepository, Repositories};
use bvs_db::DbPool;

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl = AuthService<PgUserRepository, PgAccessRepository>;

/// Type alias for the user service with concrete repository types
pub type UserServiceImpl = UserService<PgUserRepository, PgAccessRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and bearer resolution
    pub auth: Arc<AuthServiceImpl>,
    /// Gated user CRUD
    pub users: Arc<UserServiceImpl>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire services over the pool
    pub fn new(config: Config, pool: DbPool) -> Result<Self, AuthError> {
        let repos = Repositories::new(pool.clone());
        let user_repo = Arc::new(repos.users);
        let access_repo = Arc::new(repos.access);

        let hasher = PasswordHasher::new(config.auth.bcrypt_cost)?;
        let auth = AuthService::with_hasher(
            &config.auth,
            hasher.clone(),
            Arc::clone(&user_repo),
            Arc::clone(&access_repo),
        )?;
        let users = UserService::new(hasher, user_repo, access_repo);

        Ok(Self {
            auth: Arc::new(auth),
            users: Arc::new(users),
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        })
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}
