// Client-side auth wrapper over the Gatehouse session API.
//
// `AuthClient` holds reactive state (loading flag, current session) in a
// watch channel and exposes the sign-in/sign-out actions the UI binds to.
// Navigation is a side effect behind the `Navigator` seam so hosts decide
// what "go to /" means (and tests can observe it).

pub mod guard;
pub mod state;

use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_contracts::SessionInfo;
use tokio::sync::watch;

pub use guard::{route_guard, GuardedRoute, RouteOutcome, LANDING_ROUTE};
pub use state::AuthState;

/// Host-provided navigation side effect
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, to: &str);
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
}

impl AuthClient {
    /// Create a client against the given API base URL.
    /// Redirects are not followed: the provider hand-off is a navigation,
    /// not an HTTP hop this client should take itself.
    pub fn new(
        base_url: impl Into<String>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let (state, _) = watch::channel(AuthState::default());
        Ok(Self {
            http,
            base_url: base_url.into(),
            navigator,
            state,
        })
    }

    /// Subscribe to auth state changes
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Snapshot of the current auth state
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn signed_in(&self) -> bool {
        self.state.borrow().signed_in()
    }

    /// Start the social sign-in flow for the fixed provider.
    /// The provider authorization URL is handed to the navigator; failures
    /// are logged and swallowed, and the loading flag clears either way.
    pub async fn sign_in(&self) {
        self.set_loading(true);

        match self
            .http
            .get(format!("{}/v1/auth/signin/github", self.base_url))
            .send()
            .await
        {
            Ok(response) => {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok());
                match location {
                    Some(url) => self.navigator.navigate(url).await,
                    None => {
                        tracing::warn!(status = %response.status(), "sign-in did not redirect")
                    }
                }
            }
            Err(e) => tracing::warn!("sign-in request failed: {}", e),
        }

        self.set_loading(false);
    }

    /// Sign out and navigate to the landing route.
    /// Exactly one navigation happens after the sign-out call resolves,
    /// regardless of its outcome.
    pub async fn sign_out(&self) {
        self.set_loading(true);

        if let Err(e) = self
            .http
            .post(format!("{}/v1/auth/signout", self.base_url))
            .send()
            .await
        {
            tracing::warn!("sign-out request failed: {}", e);
        }

        self.state.send_modify(|s| s.session = None);
        self.navigator.navigate(guard::LANDING_ROUTE).await;

        self.set_loading(false);
    }

    /// Fetch the current session from the API and publish it
    pub async fn refresh(&self) {
        match self
            .http
            .get(format!("{}/v1/auth/session", self.base_url))
            .send()
            .await
        {
            Ok(response) => match response.json::<Option<SessionInfo>>().await {
                Ok(info) => self.state.send_modify(|s| s.session = info),
                Err(e) => tracing::warn!("failed to parse session response: {}", e),
            },
            Err(e) => tracing::warn!("session refresh failed: {}", e),
        }
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }
}
