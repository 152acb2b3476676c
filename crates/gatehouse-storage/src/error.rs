// Storage error taxonomy
//
// Initialization failures (connect, migrate) are surfaced as typed errors
// to every caller of the lazy accessor instead of being logged and
// swallowed; query failures propagate from the store operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}
