//! PostgreSQL client repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ClientRow;
use crate::repo::{ClientRepository, CreateClient};

/// PostgreSQL client repository
#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    /// Create a new client repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClientRow>> {
        let client = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, client_type, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<ClientRow>> {
        let client = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, client_type, created_at
            FROM clients
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn create(&self, client: CreateClient) -> DbResult<ClientRow> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (id, name, client_type)
            VALUES ($1, $2, $3)
            RETURNING id, name, client_type, created_at
            "#,
        )
        .bind(client.id)
        .bind(&client.name)
        .bind(client.client_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
