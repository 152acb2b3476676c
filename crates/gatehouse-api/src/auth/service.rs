// Auth adapter binding the OAuth provider, the selected database and the
// session settings together. Session lookup is a pure function of request
// headers; issuance happens only in the OAuth callback.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use gatehouse_config::AuthConfig;
use gatehouse_contracts::SessionInfo;
use gatehouse_storage::{models, AuthStore as _, LazyDatabase, NewSession, NewUser, StorageError};

use super::oauth::GitHubOAuthService;
use super::token::{
    generate_session_token, hash_session_token, is_valid_session_token_format,
};

/// Name of the browser session cookie
pub const SESSION_COOKIE: &str = "gatehouse_session";

const GITHUB_PROVIDER: &str = "github";

/// Result of a completed OAuth sign-in
pub struct SignedIn {
    pub info: SessionInfo,
    /// Full session token, raw form; goes into the Set-Cookie header only
    pub token: String,
}

pub struct AuthService {
    db: Arc<LazyDatabase>,
    github: Option<GitHubOAuthService>,
    session_max_age: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig, db: Arc<LazyDatabase>) -> Self {
        let github = config.github.as_ref().map(GitHubOAuthService::new);
        Self {
            db,
            github,
            session_max_age: Duration::minutes(config.session_max_age_minutes as i64),
        }
    }

    pub fn github(&self) -> Option<&GitHubOAuthService> {
        self.github.as_ref()
    }

    /// Resolve the session carried by the inbound request, if any.
    /// Accepts the session cookie or an `Authorization: Bearer` token.
    pub async fn session_from_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<SessionInfo>, StorageError> {
        let Some(token) = token_from_headers(headers) else {
            return Ok(None);
        };
        if !is_valid_session_token_format(&token) {
            return Ok(None);
        }

        let store = self.db.store().await?;
        let found = store.get_session(&hash_session_token(&token)).await?;
        Ok(found.map(|(session, user)| models::session_info(session, user)))
    }

    /// Complete the OAuth flow: exchange the code, upsert the user and
    /// issue a fresh session.
    pub async fn complete_sign_in(&self, code: &str) -> Result<SignedIn> {
        let github = self
            .github
            .as_ref()
            .context("GitHub sign-in is not configured")?;

        let oauth_user = github.exchange_code(code).await?;

        let store = self.db.store().await.context("database unavailable")?;
        let user = store
            .upsert_user(NewUser {
                provider: GITHUB_PROVIDER.to_string(),
                provider_account_id: oauth_user.provider_id,
                email: oauth_user.email,
                name: oauth_user.name,
                avatar_url: oauth_user.avatar_url,
            })
            .await
            .context("failed to persist user")?;

        let generated = generate_session_token();
        let session = store
            .create_session(NewSession {
                user_id: user.id,
                token_hash: generated.token_hash,
                expires_at: Utc::now() + self.session_max_age,
            })
            .await
            .context("failed to persist session")?;

        Ok(SignedIn {
            info: models::session_info(session, user),
            token: generated.token,
        })
    }

    /// Delete the session behind the given token. Returns whether a
    /// session actually existed.
    pub async fn sign_out(&self, token: &str) -> Result<bool, StorageError> {
        if !is_valid_session_token_format(token) {
            return Ok(false);
        }
        let store = self.db.store().await?;
        store.delete_session(&hash_session_token(token)).await
    }
}

/// Extract the raw session token from request headers
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then(|| value.to_string())
            })
        })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; gatehouse_session=gs_abc; theme=dark"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("gs_abc"));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer gs_abc"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("gs_abc"));
    }

    #[test]
    fn test_no_token() {
        let headers = HeaderMap::new();
        assert!(token_from_headers(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert!(token_from_headers(&headers).is_none());
    }
}
