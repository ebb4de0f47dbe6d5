//! Repository traits
//!
//! Define async repository interfaces for database operations. Implementations
//! must report uniqueness failures as [`DbError::UniqueViolation`] and missing
//! targets of update/delete as [`DbError::NotFound`].
//!
//! [`DbError::UniqueViolation`]: crate::DbError::UniqueViolation
//! [`DbError::NotFound`]: crate::DbError::NotFound

use async_trait::async_trait;
use bvs_types::ClientType;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email (exact, case-sensitive)
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Apply a partial update and return the updated row
    async fn update(&self, id: Uuid, changes: UpdateUser) -> DbResult<UserRow>;

    /// Delete a user
    async fn delete(&self, id: Uuid) -> DbResult<()>;

    /// List users, newest first, optionally scoped to a client type
    async fn list(&self, filter: &UserListFilter) -> DbResult<UserPage>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: String,
}

/// Partial user update.
///
/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.avatar_url.is_none()
            && self.password_hash.is_none()
    }
}

/// User listing filter
#[derive(Debug, Clone)]
pub struct UserListFilter {
    /// Only users with at least one membership of this client type
    pub client_type: Option<ClientType>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of users plus the unpaged total
#[derive(Debug, Clone)]
pub struct UserPage {
    pub rows: Vec<UserRow>,
    pub total: i64,
}

/// Role and membership lookups
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Global role names held by a user
    async fn list_roles_for_user(&self, user_id: Uuid) -> DbResult<Vec<String>>;

    /// Memberships of a user, oldest first (ties broken by client id)
    async fn list_memberships_for_user(&self, user_id: Uuid) -> DbResult<Vec<MembershipRow>>;

    /// Memberships for many users at once, in the same per-user order
    async fn list_memberships_for_users(&self, user_ids: &[Uuid]) -> DbResult<Vec<MembershipRow>>;

    /// Grant a global role
    async fn assign_role(&self, user_id: Uuid, role: &str) -> DbResult<RoleRow>;

    /// Add a user to a client
    async fn add_membership(&self, user_id: Uuid, client_id: Uuid) -> DbResult<MembershipRow>;
}

/// Client repository trait
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find a client by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClientRow>>;

    /// Find a client by its unique name
    async fn find_by_name(&self, name: &str) -> DbResult<Option<ClientRow>>;

    /// Create a new client
    async fn create(&self, client: CreateClient) -> DbResult<ClientRow>;
}

/// Create client input
#[derive(Debug, Clone)]
pub struct CreateClient {
    pub id: Uuid,
    pub name: String,
    pub client_type: ClientType,
}
