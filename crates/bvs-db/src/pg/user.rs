//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::{CreateUser, UpdateUser, UserListFilter, UserPage, UserRepository};

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, avatar_url, password_hash, created_at, updated_at";

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, avatar_url, password_hash,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, avatar_url, password_hash,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, avatar_url, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, first_name, last_name, avatar_url, password_hash,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.avatar_url)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> DbResult<UserRow> {
        if changes.is_empty() {
            return self.find_by_id(id).await?.ok_or(DbError::NotFound);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        if let Some(email) = changes.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(first_name) = changes.first_name {
            qb.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = changes.last_name {
            qb.push(", last_name = ").push_bind(last_name);
        }
        if let Some(avatar_url) = changes.avatar_url {
            qb.push(", avatar_url = ").push_bind(avatar_url);
        }
        if let Some(password_hash) = changes.password_hash {
            qb.push(", password_hash = ").push_bind(password_hash);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(USER_COLUMNS);

        let row = qb
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: &UserListFilter) -> DbResult<UserPage> {
        let client_type = filter.client_type.map(|t| t.as_str());

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.avatar_url, u.password_hash,
                   u.created_at, u.updated_at
            FROM users u
            WHERE $1::text IS NULL OR EXISTS (
                SELECT 1
                FROM memberships m
                JOIN clients c ON c.id = m.client_id
                WHERE m.user_id = u.id AND c.client_type = $1
            )
            ORDER BY u.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(client_type)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users u
            WHERE $1::text IS NULL OR EXISTS (
                SELECT 1
                FROM memberships m
                JOIN clients c ON c.id = m.client_id
                WHERE m.user_id = u.id AND c.client_type = $1
            )
            "#,
        )
        .bind(client_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserPage { rows, total })
    }
}
