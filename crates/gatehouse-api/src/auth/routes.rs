// Auth HTTP routes: the endpoint surface of the session API.
//
// GET  /v1/auth/signin/github   -> redirect to the provider
// GET  /v1/auth/callback/github -> code exchange, session issuance
// POST /v1/auth/signout         -> delete session, clear cookie
// GET  /v1/auth/session         -> current session or null

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gatehouse_config::AppEnv;
use gatehouse_contracts::SessionInfo;
use serde::Deserialize;

use super::service::SESSION_COOKIE;
use super::token::generate_oauth_state;
use crate::AppState;

/// Short-lived cookie carrying the OAuth state across the provider round trip
pub const STATE_COOKIE: &str = "gatehouse_oauth_state";

const STATE_COOKIE_MAX_AGE_MINUTES: i64 = 10;

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/auth/signin/github", get(signin_github))
        .route("/v1/auth/callback/github", get(callback_github))
        .route("/v1/auth/signout", post(signout))
        .route("/v1/auth/session", get(get_session))
        .with_state(state)
}

/// GET /v1/auth/signin/github - Start the GitHub OAuth flow
#[utoipa::path(
    get,
    path = "/v1/auth/signin/github",
    responses(
        (status = 303, description = "Redirect to the GitHub authorization page"),
        (status = 404, description = "GitHub sign-in is not configured")
    ),
    tag = "auth"
)]
pub async fn signin_github(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), (StatusCode, &'static str)> {
    let Some(github) = state.auth.github() else {
        return Err((StatusCode::NOT_FOUND, "GitHub sign-in is not configured"));
    };

    let auth_url = github.authorization_url(&generate_oauth_state());

    let cookie = Cookie::build((STATE_COOKIE, auth_url.state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.app_env == AppEnv::Production)
        .max_age(time::Duration::minutes(STATE_COOKIE_MAX_AGE_MINUTES));

    Ok((jar.add(cookie), Redirect::to(&auth_url.url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// GET /v1/auth/callback/github - Finish the OAuth flow and issue a session
#[utoipa::path(
    get,
    path = "/v1/auth/callback/github",
    params(
        ("code" = String, Query, description = "Authorization code from GitHub"),
        ("state" = String, Query, description = "Opaque state from the sign-in redirect")
    ),
    responses(
        (status = 303, description = "Session issued, redirect to the landing route"),
        (status = 400, description = "Missing or mismatched OAuth state"),
        (status = 502, description = "Code exchange with the provider failed")
    ),
    tag = "auth"
)]
pub async fn callback_github(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), (StatusCode, CookieJar, &'static str)> {
    // The state cookie is single-use: it comes off on every outcome so a
    // stale value cannot leak into a retried flow
    let expected = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((STATE_COOKIE, "")).path("/"));

    if expected.as_deref() != Some(query.state.as_str()) {
        return Err((StatusCode::BAD_REQUEST, jar, "invalid OAuth state"));
    }

    let signed_in = match state.auth.complete_sign_in(&query.code).await {
        Ok(signed_in) => signed_in,
        Err(e) => {
            tracing::error!("OAuth sign-in failed: {:#}", e);
            return Err((StatusCode::BAD_GATEWAY, jar, "sign-in failed"));
        }
    };

    let session_cookie = Cookie::build((SESSION_COOKIE, signed_in.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.app_env == AppEnv::Production)
        .max_age(time::Duration::minutes(
            state.config.auth.session_max_age_minutes as i64,
        ));

    let jar = jar.add(session_cookie);

    tracing::info!(user_id = %signed_in.info.user.id, "user signed in");
    Ok((jar, Redirect::to("/")))
}

/// POST /v1/auth/signout - Delete the current session and clear the cookie
#[utoipa::path(
    post,
    path = "/v1/auth/signout",
    responses(
        (status = 204, description = "Session deleted (or none existed); cookie cleared")
    ),
    tag = "auth"
)]
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        // Best effort: the cookie is cleared even if the row delete fails
        if let Err(e) = state.auth.sign_out(cookie.value()).await {
            tracing::error!("failed to delete session: {}", e);
        }
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// GET /v1/auth/session - Current session, or null when unauthenticated
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Current session info, null when absent", body = SessionInfo),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Option<SessionInfo>>, (StatusCode, &'static str)> {
    let info = state
        .auth
        .session_from_headers(&headers)
        .await
        .map_err(|e| {
            tracing::error!("session lookup failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        })?;

    Ok(Json(info))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{issue_session, test_state, test_state_without_github};

    #[tokio::test]
    async fn test_signin_redirects_to_github_with_state_cookie() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/signin/github")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://github.com/login/oauth/authorize?"));

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(STATE_COOKIE));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_signin_without_github_config_is_not_found() {
        let app = crate::app(test_state_without_github().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/signin/github")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_callback_rejects_mismatched_state() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/callback/github?code=abc&state=forged")
                    .header(header::COOKIE, format!("{}=expected", STATE_COOKIE))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_callback_rejection_clears_state_cookie() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/callback/github?code=abc&state=forged")
                    .header(header::COOKIE, format!("{}=expected", STATE_COOKIE))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{}=", STATE_COOKIE)));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_callback_rejects_missing_state_cookie() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/callback/github?code=abc&state=whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_session_is_null_when_unauthenticated() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"null");
    }

    #[tokio::test]
    async fn test_get_session_returns_session_info() {
        let state = test_state().await;
        let (token, issued) = issue_session(&state).await;
        let app = crate::app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/session")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let info: Option<SessionInfo> = serde_json::from_slice(&body).unwrap();
        assert_eq!(info, Some(issued));
    }

    #[tokio::test]
    async fn test_signout_deletes_session_and_clears_cookie() {
        let state = test_state().await;
        let (token, _) = issue_session(&state).await;
        let app = crate::app(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/signout")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{}=", SESSION_COOKIE)));

        // The session is gone server-side too
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/auth/session")
                    .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"null");
    }

    #[tokio::test]
    async fn test_signout_without_session_still_succeeds() {
        let app = crate::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/auth/signout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
