// Environment configuration loaded and validated at startup.
// Decision: validation reports every missing/invalid key at once, then the
// process exits; configuration errors are operator errors and are fatal.

use std::fmt;

use thiserror::Error;

/// Runtime mode of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(AppEnv::Development),
            "production" | "prod" => Some(AppEnv::Production),
            "test" => Some(AppEnv::Test),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, AppEnv::Development)
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        };
        f.write_str(s)
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string for the networked backend, or the embedded
    /// store's path/URL when `use_embedded` is set
    pub url: String,
    /// Select the in-process embedded backend instead of a network pool
    pub use_embedded: bool,
}

/// GitHub OAuth client credentials
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Authentication settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL for OAuth callbacks and the auth client
    pub base_url: String,
    /// GitHub OAuth credentials; sign-in routes are disabled when absent
    pub github: Option<GitHubOAuthConfig>,
    /// Session lifetime in minutes
    pub session_max_age_minutes: u64,
}

/// Complete process configuration, immutable after validation
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// Configuration validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more schema violations, all reported together
    #[error("invalid environment: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

const DEFAULT_BASE_URL: &str = "http://localhost:9000";
const DEFAULT_SESSION_MAX_AGE_MINUTES: u64 = 30 * 24 * 60; // 30 days

// Upper bound so the lifetime always fits the duration arithmetic
// downstream (cookie max-age, session expiry)
const MAX_SESSION_MAX_AGE_MINUTES: u64 = 100 * 365 * 24 * 60; // 100 years

const TRUTHY: &[&str] = &["1", "true", "yes", "on"];

impl Config {
    /// Load configuration from process environment variables.
    /// Loads `.env` first so local development works without exporting vars.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    /// Validation collects every problem before failing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();

        let app_env = match lookup("APP_ENV").filter(|s| !s.is_empty()) {
            Some(raw) => match AppEnv::parse(&raw) {
                Some(env) => Some(env),
                None => {
                    problems.push(format!(
                        "APP_ENV: expected development|production|test, got {:?}",
                        raw
                    ));
                    None
                }
            },
            None => {
                problems.push("APP_ENV: required".to_string());
                None
            }
        };

        let database_url = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => Some(url),
            None => {
                problems.push("DATABASE_URL: required".to_string());
                None
            }
        };

        let use_embedded = lookup("DATABASE_USE_EMBEDDED")
            .map(|s| TRUTHY.contains(&s.to_lowercase().as_str()))
            .unwrap_or(false);

        let base_url = lookup("AUTH_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Credentials are optional as a pair; one without the other is an
        // operator mistake and gets reported like a missing required key.
        let github = match (
            lookup("AUTH_GITHUB_CLIENT_ID").filter(|s| !s.is_empty()),
            lookup("AUTH_GITHUB_CLIENT_SECRET").filter(|s| !s.is_empty()),
        ) {
            (Some(client_id), Some(client_secret)) => {
                let redirect_uri = lookup("AUTH_GITHUB_REDIRECT_URI")
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| format!("{}/v1/auth/callback/github", base_url));
                Some(GitHubOAuthConfig {
                    client_id,
                    client_secret,
                    redirect_uri,
                })
            }
            (None, None) => None,
            (Some(_), None) => {
                problems.push("AUTH_GITHUB_CLIENT_SECRET: required when AUTH_GITHUB_CLIENT_ID is set".to_string());
                None
            }
            (None, Some(_)) => {
                problems.push("AUTH_GITHUB_CLIENT_ID: required when AUTH_GITHUB_CLIENT_SECRET is set".to_string());
                None
            }
        };

        let session_max_age_minutes = match lookup("AUTH_SESSION_MAX_AGE") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(mins) if (1..=MAX_SESSION_MAX_AGE_MINUTES).contains(&mins) => mins,
                _ => {
                    problems.push(format!(
                        "AUTH_SESSION_MAX_AGE: expected minutes between 1 and {}, got {:?}",
                        MAX_SESSION_MAX_AGE_MINUTES, raw
                    ));
                    DEFAULT_SESSION_MAX_AGE_MINUTES
                }
            },
            None => DEFAULT_SESSION_MAX_AGE_MINUTES,
        };

        if !problems.is_empty() {
            return Err(ConfigError::Invalid(problems));
        }

        Ok(Config {
            // Both unwraps guarded by the problems check above
            app_env: app_env.expect("validated"),
            database: DatabaseConfig {
                url: database_url.expect("validated"),
                use_embedded,
            },
            auth: AuthConfig {
                base_url,
                github,
                session_max_age_minutes,
            },
        })
    }
}
