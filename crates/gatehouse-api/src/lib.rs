// Gatehouse API server: session auth over a selectable database backend.
//
// The router is assembled here so tests can drive it with `oneshot`;
// `main.rs` only wires configuration, CORS and the listener.

pub mod auth;
pub mod me;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use gatehouse_config::Config;
use gatehouse_contracts::{Session, SessionInfo, User};
use gatehouse_storage::LazyDatabase;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::AuthService;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<LazyDatabase>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let db = Arc::new(LazyDatabase::new(config.database.clone()));
        let auth = Arc::new(AuthService::new(&config.auth, db.clone()));
        Self { config, db, auth }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    app_env: String,
    database_backend: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        app_env: state.config.app_env.to_string(),
        database_backend: if state.config.database.use_embedded {
            "embedded"
        } else {
            "postgres"
        },
    })
}

/// OpenAPI documentation, mounted only in development
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::signin_github,
        auth::routes::callback_github,
        auth::routes::signout,
        auth::routes::get_session,
        me::get_me,
    ),
    components(schemas(User, Session, SessionInfo)),
    tags(
        (name = "auth", description = "Session and OAuth endpoints"),
        (name = "me", description = "Authenticated user endpoints")
    ),
    info(
        title = "Gatehouse API",
        version = "0.1.0",
        description = "Session-auth scaffold: social sign-in, cookie sessions, guarded routes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .merge(auth::routes(state.clone()))
        .merge(me::routes(state.clone()));

    // Development-only introspection UI
    if state.config.app_env.is_development() {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::test_support::test_state;

    #[tokio::test]
    async fn test_health_reports_backend() {
        let app = super::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_swagger_ui_not_mounted_outside_development() {
        let app = super::app(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
