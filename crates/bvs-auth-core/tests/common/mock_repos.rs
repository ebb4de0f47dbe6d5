//! Mock repositories for testing
//!
//! One in-memory store implements every repository trait so that user
//! listing can see memberships. Uniqueness is enforced like the real
//! constraints.

use async_trait::async_trait;
use bvs_db::{
    AccessRepository, ClientRepository, ClientRow, CreateClient, CreateUser, DbError, DbResult,
    MembershipRow, RoleRow, UpdateUser, UserListFilter, UserPage, UserRepository, UserRow,
};
use bvs_types::ClientType;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// In-memory store for testing
#[derive(Clone)]
pub struct MockStore {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
    clients: Arc<DashMap<Uuid, ClientRow>>,
    memberships: Arc<DashMap<(Uuid, Uuid), MembershipRow>>,
    roles: Arc<DashMap<(Uuid, String), RoleRow>>,
    epoch: DateTime<Utc>,
    tick: Arc<AtomicI64>,
    calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            users: Arc::default(),
            by_email: Arc::default(),
            clients: Arc::default(),
            memberships: Arc::default(),
            roles: Arc::default(),
            epoch: Utc::now(),
            tick: Arc::default(),
            calls: Arc::default(),
            unavailable: Arc::default(),
        }
    }
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing timestamps so ordering is deterministic
    fn now(&self) -> DateTime<Utc> {
        let tick = self.tick.fetch_add(1, Ordering::SeqCst);
        self.epoch + Duration::milliseconds(tick)
    }

    fn enter(&self) -> DbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    /// Number of repository calls made so far
    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every repository call fail with an opaque driver error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn user(&self, id: Uuid) -> Option<UserRow> {
        self.users.get(&id).map(|r| r.value().clone())
    }

    /// Insert a user directly, bypassing uniqueness checks
    pub fn insert_user(&self, user: UserRow) {
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user);
    }

    /// Build a user row with the next timestamp
    pub fn test_user(&self, email: &str, password_hash: Option<String>) -> UserRow {
        let now = self.now();
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn seed_client(&self, name: &str, client_type: ClientType) -> ClientRow {
        let row = ClientRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            client_type: client_type.as_str().to_string(),
            created_at: self.now(),
        };
        self.clients.insert(row.id, row.clone());
        row
    }

    pub fn seed_membership(&self, user_id: Uuid, client_id: Uuid) -> MembershipRow {
        let client_type = self
            .clients
            .get(&client_id)
            .map(|c| c.client_type.clone())
            .expect("seeded client");
        let row = MembershipRow {
            user_id,
            client_id,
            client_type,
            created_at: self.now(),
        };
        self.memberships.insert((user_id, client_id), row.clone());
        row
    }

    pub fn seed_admin(&self, user_id: Uuid) {
        self.roles.insert(
            (user_id, "BVS_ADMIN".to_string()),
            RoleRow {
                user_id,
                role: "BVS_ADMIN".to_string(),
                created_at: self.now(),
            },
        );
    }

    fn memberships_of(&self, user_id: Uuid) -> Vec<MembershipRow> {
        let mut rows: Vec<MembershipRow> = self
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.client_id.cmp(&b.client_id))
        });
        rows
    }

    fn has_membership_of_type(&self, user_id: Uuid, client_type: ClientType) -> bool {
        self.memberships
            .iter()
            .any(|m| m.user_id == user_id && m.client_type == client_type.as_str())
    }
}

fn email_violation() -> DbError {
    DbError::UniqueViolation {
        constraint: Some("users_email_key".to_string()),
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        self.enter()?;
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        self.enter()?;
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        self.enter()?;
        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(email_violation()),
            Entry::Vacant(slot) => {
                let now = self.now();
                let row = UserRow {
                    id: user.id,
                    email: user.email,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    avatar_url: user.avatar_url,
                    password_hash: Some(user.password_hash),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(row.id);
                self.users.insert(row.id, row.clone());
                Ok(row)
            }
        }
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> DbResult<UserRow> {
        self.enter()?;
        let current = self.users.get(&id).map(|r| r.value().clone()).ok_or(DbError::NotFound)?;

        if let Some(email) = &changes.email {
            if *email != current.email {
                match self.by_email.entry(email.clone()) {
                    Entry::Occupied(_) => return Err(email_violation()),
                    Entry::Vacant(slot) => {
                        slot.insert(id);
                    }
                }
                self.by_email.remove(&current.email);
            }
        }

        let mut row = current;
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(first_name) = changes.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = last_name;
        }
        if let Some(avatar_url) = changes.avatar_url {
            row.avatar_url = avatar_url;
        }
        if let Some(password_hash) = changes.password_hash {
            row.password_hash = Some(password_hash);
        }
        row.updated_at = self.now();

        self.users.insert(id, row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.enter()?;
        let (_, user) = self.users.remove(&id).ok_or(DbError::NotFound)?;
        self.by_email.remove(&user.email);
        self.memberships.retain(|(user_id, _), _| *user_id != id);
        self.roles.retain(|(user_id, _), _| *user_id != id);
        Ok(())
    }

    async fn list(&self, filter: &UserListFilter) -> DbResult<UserPage> {
        self.enter()?;
        let mut rows: Vec<UserRow> = self
            .users
            .iter()
            .map(|r| r.value().clone())
            .filter(|u| match filter.client_type {
                Some(client_type) => self.has_membership_of_type(u.id, client_type),
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = rows.len() as i64;
        let rows = rows
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();

        Ok(UserPage { rows, total })
    }
}

#[async_trait]
impl AccessRepository for MockStore {
    async fn list_roles_for_user(&self, user_id: Uuid) -> DbResult<Vec<String>> {
        self.enter()?;
        let mut roles: Vec<String> = self
            .roles
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.role.clone())
            .collect();
        roles.sort();
        Ok(roles)
    }

    async fn list_memberships_for_user(&self, user_id: Uuid) -> DbResult<Vec<MembershipRow>> {
        self.enter()?;
        Ok(self.memberships_of(user_id))
    }

    async fn list_memberships_for_users(&self, user_ids: &[Uuid]) -> DbResult<Vec<MembershipRow>> {
        self.enter()?;
        Ok(user_ids
            .iter()
            .flat_map(|id| self.memberships_of(*id))
            .collect())
    }

    async fn assign_role(&self, user_id: Uuid, role: &str) -> DbResult<RoleRow> {
        self.enter()?;
        match self.roles.entry((user_id, role.to_string())) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation {
                constraint: Some("user_global_roles_pkey".to_string()),
            }),
            Entry::Vacant(slot) => {
                let row = RoleRow {
                    user_id,
                    role: role.to_string(),
                    created_at: self.now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn add_membership(&self, user_id: Uuid, client_id: Uuid) -> DbResult<MembershipRow> {
        self.enter()?;
        let client_type = self
            .clients
            .get(&client_id)
            .map(|c| c.client_type.clone())
            .ok_or(DbError::NotFound)?;
        match self.memberships.entry((user_id, client_id)) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation {
                constraint: Some("memberships_pkey".to_string()),
            }),
            Entry::Vacant(slot) => {
                let row = MembershipRow {
                    user_id,
                    client_id,
                    client_type,
                    created_at: self.now(),
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }
}

#[async_trait]
impl ClientRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClientRow>> {
        self.enter()?;
        Ok(self.clients.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<ClientRow>> {
        self.enter()?;
        Ok(self
            .clients
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value().clone()))
    }

    async fn create(&self, client: CreateClient) -> DbResult<ClientRow> {
        self.enter()?;
        if self.clients.iter().any(|c| c.name == client.name) {
            return Err(DbError::UniqueViolation {
                constraint: Some("clients_name_key".to_string()),
            });
        }
        let row = ClientRow {
            id: client.id,
            name: client.name,
            client_type: client.client_type.as_str().to_string(),
            created_at: self.now(),
        };
        self.clients.insert(row.id, row.clone());
        Ok(row)
    }
}
