// Common capability seam over the two database backends.
// Handlers and the auth service only ever see `&dyn AuthStore`; which
// variant backs it is decided once at startup from configuration.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{NewSession, NewUser, SessionRow, UserRow};

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Insert the user on first OAuth login, refresh profile fields on
    /// every subsequent login. Keyed on (provider, provider account id).
    async fn upsert_user(&self, input: NewUser) -> Result<UserRow, StorageError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, StorageError>;

    async fn create_session(&self, input: NewSession) -> Result<SessionRow, StorageError>;

    /// Look up an unexpired session by token hash, together with its user.
    async fn get_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<(SessionRow, UserRow)>, StorageError>;

    /// Delete a session by token hash (sign-out). Returns whether a row
    /// was actually removed.
    async fn delete_session(&self, token_hash: &str) -> Result<bool, StorageError>;

    /// Maintenance sweep; returns the number of sessions removed.
    async fn delete_expired_sessions(&self) -> Result<u64, StorageError>;
}
