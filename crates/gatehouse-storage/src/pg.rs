// Networked Postgres backend.
//
// The pool is created lazily: constructing the store validates the URL but
// opens no connection until the first query. Schema for this backend is
// operator-managed; `migrate` exists for deployments that want the server
// to apply it.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{NewSession, NewUser, SessionRow, UserRow};
use crate::store::AuthStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn connect_lazy(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)
            .map_err(StorageError::Connect)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations/postgres").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthStore for PgStore {
    async fn upsert_user(&self, input: NewUser) -> Result<UserRow, StorageError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, provider, provider_account_id, email, name, avatar_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (provider, provider_account_id) DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = EXCLUDED.updated_at
            RETURNING id, provider, provider_account_id, email, name, avatar_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.provider)
        .bind(&input.provider_account_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.avatar_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, provider, provider_account_id, email, name, avatar_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create_session(&self, input: NewSession) -> Result<SessionRow, StorageError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.token_hash)
        .bind(input.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<(SessionRow, UserRow)>, StorageError> {
        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        let user = self.get_user(session.user_id).await?;
        Ok(user.map(|user| (session, user)))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
