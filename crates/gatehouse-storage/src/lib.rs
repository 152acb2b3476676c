// Storage layer with sqlx
//
// This crate selects between two backends behind one trait:
// - EmbeddedStore: in-process SQLite for local development and tests
// - PgStore: pooled networked Postgres
// The choice is made once at startup; everything else sees `dyn AuthStore`.

pub mod database;
pub mod embedded;
pub mod error;
pub mod models;
pub mod pg;
pub mod store;

pub use database::{Database, LazyDatabase};
pub use embedded::EmbeddedStore;
pub use error::StorageError;
pub use models::*;
pub use pg::PgStore;
pub use store::AuthStore;
