// Authentication module
// Decision: cookie-based sessions for the browser, bearer tokens for
// programmatic access; both resolve through the same store lookup

pub mod extract;
pub mod oauth;
pub mod routes;
pub mod service;
pub mod token;

pub use extract::RequireAuth;
pub use routes::routes;
pub use service::{AuthService, SESSION_COOKIE};
