// Embedded in-process backend (SQLite via sqlx).
//
// Used for local development and tests so no database server has to run.
// Pending migrations are applied before the store is handed out, so the
// first query always sees the full schema.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{NewSession, NewUser, SessionRow, UserRow};
use crate::store::AuthStore;

#[derive(Clone)]
pub struct EmbeddedStore {
    pool: SqlitePool,
}

impl EmbeddedStore {
    /// Open (creating if missing) the embedded database at `database_url`
    /// and apply pending migrations before returning.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url).map_err(StorageError::Connect)?
        } else {
            // Bare paths come from DATABASE_URL doubling as the store path
            SqliteConnectOptions::new().filename(database_url)
        };
        let options = options.create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let pool = pool_options(in_memory)
            .connect_with(options)
            .await
            .map_err(StorageError::Connect)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }
}

// An in-memory database exists per connection; pin the pool to a single
// connection and disable recycling, otherwise the pool reaper would
// replace it with a fresh empty database after idle/lifetime expiry.
fn pool_options(in_memory: bool) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

#[async_trait]
impl AuthStore for EmbeddedStore {
    async fn upsert_user(&self, input: NewUser) -> Result<UserRow, StorageError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, provider, provider_account_id, email, name, avatar_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT (provider, provider_account_id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                avatar_url = excluded.avatar_url,
                updated_at = excluded.updated_at
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
            WHERE id = ?1
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
            VALUES (?1, ?2, ?3, ?4, ?5)
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
            WHERE token_hash = ?1 AND expires_at > ?2
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
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
