// Current-user route, the guarded endpoint behind the session check

use axum::routing::get;
use axum::{Json, Router};
use gatehouse_contracts::User;

use crate::auth::RequireAuth;
use crate::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new().route("/v1/me", get(get_me)).with_state(state)
}

/// GET /v1/me - Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/v1/me",
    responses(
        (status = 200, description = "Authenticated user's profile", body = User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "me"
)]
pub async fn get_me(RequireAuth(info): RequireAuth) -> Json<User> {
    Json(info.user)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::SESSION_COOKIE;
    use crate::test_support::{issue_session, test_state};

    #[tokio::test]
    async fn test_me_requires_session() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(Request::builder().uri("/v1/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_profile() {
        let state = test_state().await;
        let (token, issued) = issue_session(&state).await;
        let app = crate::app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/me")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let user: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(user, issued.user);
    }
}
