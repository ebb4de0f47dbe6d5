//! User management gated by access decisions
//!
//! Listing is scoped to the caller's primary client type unless they are an
//! admin. Create, update and delete are admin-only.

use std::collections::HashMap;
use std::sync::Arc;

use bvs_db::{
    AccessRepository, CreateUser, DbError, MembershipRow, UpdateUser, UserListFilter,
    UserRepository, UserRow,
};
use bvs_types::{MembershipSummary, PublicUser, UserId};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    access::{self, Identity, ListScope},
    password::PasswordHasher,
    service::{email_conflict, load_memberships},
    validation, AuthError,
};

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Paging parameters for listing
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListUsersQuery {
    /// Apply defaults and bounds
    pub fn resolve(&self) -> Result<(i64, i64), AuthError> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AuthError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        if offset < 0 {
            return Err(AuthError::Validation(
                "offset must not be negative".to_string(),
            ));
        }
        Ok((limit, offset))
    }
}

/// A user together with their memberships
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: PublicUser,
    pub memberships: Vec<MembershipSummary>,
}

impl UserView {
    fn from_row(row: &UserRow, memberships: Vec<MembershipSummary>) -> Self {
        Self {
            user: row.to_public(),
            memberships,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

/// One page of users
#[derive(Debug, Clone, Serialize)]
pub struct UserList {
    pub data: Vec<UserView>,
    pub meta: PageMeta,
}

/// Administrative create
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Partial update. Profile fields accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub avatar_url: Option<Option<String>>,
}

impl UpdateUserInput {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.avatar_url.is_none()
    }

    fn validate(&self) -> Result<(), AuthError> {
        if let Some(email) = &self.email {
            validation::validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validation::validate_password(password)?;
        }
        validation::validate_profile(
            self.first_name.as_ref().and_then(Option::as_deref),
            self.last_name.as_ref().and_then(Option::as_deref),
            self.avatar_url.as_ref().and_then(Option::as_deref),
        )
    }
}

// Present-but-null becomes Some(None); absent stays None via #[serde(default)]
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// User CRUD behind access checks
pub struct UserService<U: UserRepository, A: AccessRepository> {
    hasher: PasswordHasher,
    user_repo: Arc<U>,
    access_repo: Arc<A>,
}

impl<U: UserRepository, A: AccessRepository> UserService<U, A> {
    /// Create a new user service
    pub fn new(hasher: PasswordHasher, user_repo: Arc<U>, access_repo: Arc<A>) -> Self {
        Self {
            hasher,
            user_repo,
            access_repo,
        }
    }

    /// List users visible to the caller, newest first
    pub async fn list(&self, identity: &Identity, query: ListUsersQuery) -> Result<UserList, AuthError> {
        let client_type = match access::can_list_users(identity) {
            ListScope::Unrestricted => None,
            ListScope::ScopedTo(client_type) => Some(client_type),
            ListScope::Denied => {
                tracing::debug!(user_id = %identity.user_id, "Listing denied: no membership");
                return Err(forbidden());
            }
        };
        let (limit, offset) = query.resolve()?;

        let page = self
            .user_repo
            .list(&UserListFilter {
                client_type,
                limit,
                offset,
            })
            .await?;

        let ids: Vec<Uuid> = page.rows.iter().map(|row| row.id).collect();
        let membership_rows = self.access_repo.list_memberships_for_users(&ids).await?;
        let mut by_user = group_memberships(membership_rows);

        let data = page
            .rows
            .iter()
            .map(|row| UserView::from_row(row, by_user.remove(&row.id).unwrap_or_default()))
            .collect();

        Ok(UserList {
            data,
            meta: PageMeta {
                limit,
                offset,
                total: page.total,
            },
        })
    }

    /// Fetch one user.
    ///
    /// Existence is checked before permission, so a missing id is NotFound
    /// even for callers who could not see it.
    pub async fn get(&self, identity: &Identity, id: UserId) -> Result<UserView, AuthError> {
        let row = self
            .user_repo
            .find_by_id(id.0)
            .await?
            .ok_or_else(user_not_found)?;

        let memberships = load_memberships(self.access_repo.as_ref(), id).await?;
        if !access::can_view_user(identity, &memberships) {
            tracing::debug!(user_id = %identity.user_id, target = %id, "View denied");
            return Err(forbidden());
        }

        Ok(UserView::from_row(&row, memberships))
    }

    /// Administrative create
    pub async fn create(&self, identity: &Identity, input: CreateUserInput) -> Result<UserView, AuthError> {
        self.require_mutate(identity)?;

        validation::validate_email(&input.email)?;
        validation::validate_password(&input.password)?;
        validation::validate_profile(
            input.first_name.as_deref(),
            input.last_name.as_deref(),
            input.avatar_url.as_deref(),
        )?;

        let password_hash = self.hasher.hash_async(input.password).await?;
        let row = self
            .user_repo
            .create(CreateUser {
                id: Uuid::new_v4(),
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                avatar_url: input.avatar_url,
                password_hash,
            })
            .await
            .map_err(map_write_error)?;

        tracing::info!(user_id = %row.id, by = %identity.user_id, "User created");
        Ok(UserView::from_row(&row, Vec::new()))
    }

    /// Administrative partial update
    pub async fn update(
        &self,
        identity: &Identity,
        id: UserId,
        input: UpdateUserInput,
    ) -> Result<UserView, AuthError> {
        self.require_mutate(identity)?;

        if input.is_empty() {
            return Err(AuthError::Validation("No fields to update".to_string()));
        }
        input.validate()?;

        let password_hash = match input.password {
            Some(password) => Some(self.hasher.hash_async(password).await?),
            None => None,
        };

        let changes = UpdateUser {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            avatar_url: input.avatar_url,
            password_hash,
        };

        let row = self
            .user_repo
            .update(id.0, changes)
            .await
            .map_err(map_write_error)?;
        let memberships = load_memberships(self.access_repo.as_ref(), id).await?;

        tracing::info!(user_id = %id, by = %identity.user_id, "User updated");
        Ok(UserView::from_row(&row, memberships))
    }

    /// Administrative hard delete
    pub async fn delete(&self, identity: &Identity, id: UserId) -> Result<(), AuthError> {
        self.require_mutate(identity)?;

        self.user_repo.delete(id.0).await.map_err(map_write_error)?;

        tracing::info!(user_id = %id, by = %identity.user_id, "User deleted");
        Ok(())
    }

    fn require_mutate(&self, identity: &Identity) -> Result<(), AuthError> {
        if access::can_mutate_users(identity) {
            Ok(())
        } else {
            tracing::debug!(user_id = %identity.user_id, "Mutation denied: not an admin");
            Err(forbidden())
        }
    }
}

fn forbidden() -> AuthError {
    AuthError::Forbidden("Forbidden".to_string())
}

fn user_not_found() -> AuthError {
    AuthError::NotFound("User not found".to_string())
}

// Email is the only unique column on users
fn map_write_error(err: DbError) -> AuthError {
    match err {
        DbError::UniqueViolation { .. } => email_conflict(),
        DbError::NotFound => user_not_found(),
        other => other.into(),
    }
}

fn group_memberships(rows: Vec<MembershipRow>) -> HashMap<Uuid, Vec<MembershipSummary>> {
    let mut by_user: HashMap<Uuid, Vec<MembershipSummary>> = HashMap::new();
    for row in rows {
        if let Some(summary) = row.summary() {
            by_user.entry(row.user_id).or_default().push(summary);
        }
    }
    by_user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults_and_bounds() {
        assert_eq!(ListUsersQuery::default().resolve().unwrap(), (20, 0));
        let q = ListUsersQuery {
            limit: Some(100),
            offset: Some(40),
        };
        assert_eq!(q.resolve().unwrap(), (100, 40));

        for (limit, offset) in [(Some(0), None), (Some(101), None), (None, Some(-1))] {
            let q = ListUsersQuery { limit, offset };
            assert!(matches!(q.resolve(), Err(AuthError::Validation(_))));
        }
    }

    #[test]
    fn test_update_input_distinguishes_null_from_absent() {
        let input: UpdateUserInput =
            serde_json::from_str(r#"{"firstName": null, "lastName": "Lovelace"}"#).unwrap();
        assert_eq!(input.first_name, Some(None));
        assert_eq!(input.last_name, Some(Some("Lovelace".to_string())));
        assert_eq!(input.avatar_url, None);
        assert!(!input.is_empty());

        let empty: UpdateUserInput = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_update_input_validation() {
        let cleared = UpdateUserInput {
            first_name: Some(None),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());

        let blank = UpdateUserInput {
            first_name: Some(Some(String::new())),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let short = UpdateUserInput {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn test_user_view_flattens_public_user() {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            password_hash: Some("hash".to_string()),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(UserView::from_row(&row, vec![])).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert!(json["memberships"].as_array().unwrap().is_empty());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
