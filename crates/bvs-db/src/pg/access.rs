//! PostgreSQL role and membership repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{MembershipRow, RoleRow};
use crate::repo::AccessRepository;

/// PostgreSQL access repository
#[derive(Clone)]
pub struct PgAccessRepository {
    pool: PgPool,
}

impl PgAccessRepository {
    /// Create a new access repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRepository for PgAccessRepository {
    async fn list_roles_for_user(&self, user_id: Uuid) -> DbResult<Vec<String>> {
        let roles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role
            FROM user_global_roles
            WHERE user_id = $1
            ORDER BY role
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn list_memberships_for_user(&self, user_id: Uuid) -> DbResult<Vec<MembershipRow>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT m.user_id, m.client_id, c.client_type, m.created_at
            FROM memberships m
            JOIN clients c ON c.id = m.client_id
            WHERE m.user_id = $1
            ORDER BY m.created_at ASC, m.client_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_memberships_for_users(&self, user_ids: &[Uuid]) -> DbResult<Vec<MembershipRow>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT m.user_id, m.client_id, c.client_type, m.created_at
            FROM memberships m
            JOIN clients c ON c.id = m.client_id
            WHERE m.user_id = ANY($1)
            ORDER BY m.user_id, m.created_at ASC, m.client_id ASC
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn assign_role(&self, user_id: Uuid, role: &str) -> DbResult<RoleRow> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO user_global_roles (user_id, role)
            VALUES ($1, $2)
            RETURNING user_id, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn add_membership(&self, user_id: Uuid, client_id: Uuid) -> DbResult<MembershipRow> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            WITH inserted AS (
                INSERT INTO memberships (user_id, client_id)
                VALUES ($1, $2)
                RETURNING user_id, client_id, created_at
            )
            SELECT i.user_id, i.client_id, c.client_type, i.created_at
            FROM inserted i
            JOIN clients c ON c.id = i.client_id
            "#,
        )
        .bind(user_id)
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
