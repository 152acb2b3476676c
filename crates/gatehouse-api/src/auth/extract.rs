// Session-requiring request guard.
//
// `RequireAuth` rejects the request with 401 "Unauthorized" before the
// handler runs when no valid session is present; otherwise it yields the
// resolved session to the handler.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use gatehouse_contracts::SessionInfo;

use crate::AppState;

/// Extractor that fails the request with 401 unless a session is present
pub struct RequireAuth(pub SessionInfo);

#[async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.auth.session_from_headers(&parts.headers).await {
            Ok(Some(info)) => Ok(RequireAuth(info)),
            Ok(None) => Err((StatusCode::UNAUTHORIZED, "Unauthorized")),
            Err(e) => {
                tracing::error!("session lookup failed: {}", e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
            }
        }
    }
}
