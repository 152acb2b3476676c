// Reactive auth state derived from the session API

use gatehouse_contracts::{SessionInfo, User};

/// Client-side view of the auth session.
/// `loading` is true for the duration of an in-flight sign-in/sign-out call.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub loading: bool,
    pub session: Option<SessionInfo>,
}

impl AuthState {
    /// Whether a session is currently present
    pub fn signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Current user profile, if signed in
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|info| &info.user)
    }
}
