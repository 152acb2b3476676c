// Auth DTOs for the public API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity record created on first successful OAuth login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Server-issued proof that a browser is authenticated as a user.
/// The opaque token itself never appears here; it lives in the cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Session plus the user it belongs to, as returned by `GET /v1/auth/session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub session: Session,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_info_round_trips_as_json() {
        let now = Utc::now();
        let info = SessionInfo {
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
        };

        let json = serde_json::to_string(&info).unwrap();
        let back: SessionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
