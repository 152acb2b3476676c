// Gatehouse API server entry point.
// Configuration is validated before anything else runs; a bad environment
// is fatal here, never retried.

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use gatehouse_api::{app, AppState};
use gatehouse_config::Config;
use gatehouse_storage::AuthStore as _;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("gatehouse-api starting...");

    // Validate the environment before any component runs
    let config = Config::from_env().context("invalid environment configuration")?;
    tracing::info!(
        app_env = %config.app_env,
        embedded_db = config.database.use_embedded,
        github_oauth = config.auth.github.is_some(),
        "configuration loaded"
    );

    let state = AppState::new(config);

    // Hourly sweep of expired sessions
    let sweep_db = state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            match sweep_db.store().await {
                Ok(store) => match store.delete_expired_sessions().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::info!(removed, "swept expired sessions"),
                    Err(e) => tracing::warn!("expired session sweep failed: {}", e),
                },
                Err(e) => tracing::warn!("database unavailable for session sweep: {}", e),
            }
        }
    });

    // Load CORS allowed origins from environment (optional)
    // Only needed when the UI is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    let mut app = app(state);

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        );
    }

    // Start server
    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
