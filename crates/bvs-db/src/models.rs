//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use bvs_types::{ClientId, ClientType, GlobalRole, MembershipSummary, PublicUser, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User row from the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Absent for accounts that cannot authenticate
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub client_type: String,
    pub created_at: DateTime<Utc>,
}

/// Membership row joined with its client's type
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub client_type: String,
    pub created_at: DateTime<Utc>,
}

/// Global role assignment row
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

// Conversion implementations from Row types to bvs-types domain types
impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Public projection (drops the password hash)
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.user_id(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ClientRow {
    /// Convert to domain ClientId
    pub fn client_id(&self) -> ClientId {
        ClientId(self.id)
    }

    /// Parsed client type, `None` if the stored value is unknown
    pub fn client_type(&self) -> Option<ClientType> {
        self.client_type.parse().ok()
    }
}

impl MembershipRow {
    /// Convert to the summary carried in tokens.
    ///
    /// Rows with an unrecognised client type are skipped rather than failing
    /// the whole lookup.
    pub fn summary(&self) -> Option<MembershipSummary> {
        match self.client_type.parse::<ClientType>() {
            Ok(client_type) => Some(MembershipSummary::new(ClientId(self.client_id), client_type)),
            Err(e) => {
                tracing::warn!(client_id = %self.client_id, error = %e, "Skipping membership");
                None
            }
        }
    }
}

impl RoleRow {
    /// Parsed role, or `None` (with a warning) for names this build does not know
    pub fn global_role(&self) -> Option<GlobalRole> {
        match self.role.parse::<GlobalRole>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(user_id = %self.user_id, error = %e, "Unknown global role");
                None
            }
        }
    }
}
