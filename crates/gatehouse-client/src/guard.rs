// Route guard: a stateless per-navigation check.
// Unauthenticated navigations to guarded routes are redirected to the
// public landing route; the original navigation never renders.

use crate::state::AuthState;

/// Public landing route, the redirect target for unauthenticated navigations
pub const LANDING_ROUTE: &str = "/";

/// Outcome of evaluating the guard before entering a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Proceed with the original navigation
    Proceed,
    /// Abort and navigate to the given route instead
    Redirect(&'static str),
}

/// Evaluate the guard for the current auth state
pub fn route_guard(state: &AuthState) -> RouteOutcome {
    if state.signed_in() {
        RouteOutcome::Proceed
    } else {
        RouteOutcome::Redirect(LANDING_ROUTE)
    }
}

/// Result of running a guarded render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedRoute<T> {
    Rendered(T),
    Redirected(&'static str),
}

/// Render a guarded route: the render closure runs only when the guard
/// lets the navigation proceed.
pub fn run_guarded<T>(state: &AuthState, render: impl FnOnce() -> T) -> GuardedRoute<T> {
    match route_guard(state) {
        RouteOutcome::Proceed => GuardedRoute::Rendered(render()),
        RouteOutcome::Redirect(to) => GuardedRoute::Redirected(to),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use gatehouse_contracts::{Session, SessionInfo, User};
    use uuid::Uuid;

    use super::*;

    fn signed_in_state() -> AuthState {
        let now = Utc::now();
        AuthState {
            loading: false,
            session: Some(SessionInfo {
                session: Session {
                    id: Uuid::now_v7(),
                    user_id: Uuid::now_v7(),
                    expires_at: now + chrono::Duration::days(30),
                    created_at: now,
                },
                user: User {
                    id: Uuid::now_v7(),
                    email: "octocat@example.com".to_string(),
                    name: "Octocat".to_string(),
                    avatar_url: None,
                    created_at: now,
                },
            }),
        }
    }

    #[test]
    fn test_signed_out_redirects_to_landing() {
        assert_eq!(
            route_guard(&AuthState::default()),
            RouteOutcome::Redirect(LANDING_ROUTE)
        );
    }

    #[test]
    fn test_signed_in_proceeds() {
        assert_eq!(route_guard(&signed_in_state()), RouteOutcome::Proceed);
    }

    #[test]
    fn test_guarded_page_never_renders_when_signed_out() {
        let mut rendered = false;
        let outcome = run_guarded(&AuthState::default(), || {
            rendered = true;
            "dashboard"
        });

        assert_eq!(outcome, GuardedRoute::Redirected(LANDING_ROUTE));
        assert!(!rendered);
    }

    #[test]
    fn test_guarded_page_renders_when_signed_in() {
        let outcome = run_guarded(&signed_in_state(), || "dashboard");
        assert_eq!(outcome, GuardedRoute::Rendered("dashboard"));
    }
}
