// OAuth service for GitHub social sign-in
// Decision: manual OAuth2 implementation to avoid http crate version conflicts
// Decision: GitHub is the only provider for now

use anyhow::{Context, Result};
use gatehouse_config::GitHubOAuthConfig;
use serde::Deserialize;

/// User info resolved from the OAuth provider
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    /// Provider user ID
    pub provider_id: String,
    /// User email
    pub email: String,
    /// User name
    pub name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
}

/// OAuth authorization URL with state
#[derive(Debug)]
pub struct OAuthAuthorizationUrl {
    pub url: String,
    pub state: String,
}

/// GitHub OAuth service
pub struct GitHubOAuthService {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GitHubOAuthService {
    pub fn new(config: &GitHubOAuthConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    /// Generate authorization URL for the OAuth flow
    pub fn authorization_url(&self, state: &str) -> OAuthAuthorizationUrl {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", "user:email read:user"),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        OAuthAuthorizationUrl {
            url: format!("https://github.com/login/oauth/authorize?{}", query),
            state: state.to_string(),
        }
    }

    /// Exchange an authorization code for user info
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthUserInfo> {
        let client = reqwest::Client::new();

        // Exchange code for token
        let token_response: GitHubTokenResponse = client
            .post("https://github.com/login/oauth/access_token")
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .context("Failed to exchange code")?
            .json()
            .await
            .context("Failed to parse token response")?;

        let access_token = &token_response.access_token;

        // Fetch user info
        let user_info: GitHubUserInfo = client
            .get("https://api.github.com/user")
            .header("User-Agent", "Gatehouse")
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to fetch user info")?
            .json()
            .await
            .context("Failed to parse user info")?;

        // GitHub may not return email in user info, need the emails endpoint
        let email = if let Some(email) = user_info.email {
            email
        } else {
            let emails: Vec<GitHubEmail> = client
                .get("https://api.github.com/user/emails")
                .header("User-Agent", "Gatehouse")
                .bearer_auth(access_token)
                .send()
                .await
                .context("Failed to fetch user emails")?
                .json()
                .await
                .context("Failed to parse user emails")?;

            emails
                .into_iter()
                .find(|e| e.primary)
                .map(|e| e.email)
                .ok_or_else(|| anyhow::anyhow!("No primary email found"))?
        };

        Ok(OAuthUserInfo {
            provider_id: user_info.id.to_string(),
            email,
            name: user_info.name.unwrap_or_else(|| user_info.login.clone()),
            avatar_url: Some(user_info.avatar_url),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct GitHubUserInfo {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    #[allow(dead_code)]
    verified: bool,
}

/// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        let mut result = String::new();
        for c in s.chars() {
            match c {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
                ' ' => result.push_str("%20"),
                _ => {
                    for byte in c.to_string().as_bytes() {
                        result.push_str(&format!("%{:02X}", byte));
                    }
                }
            }
        }
        result
    }
}
