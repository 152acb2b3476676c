// Public contracts for the Gatehouse API
// This crate defines the DTOs shared by the server and the auth client.

pub mod auth;

pub use auth::*;
