pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod hn;
mod http;
pub mod identity;
mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::json;
use tower::ServiceBuilder;
use tracing_subscriber::EnvFilter;

use config::Config;
use errors::AppError;
use middleware::{cors_layer, trace_layer};
use state::AppState;

/// Builds the full application router, including the health check and JSON 404 fallback.
pub fn app(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(|| async { "API is running" }))
        .merge(http::create_http_routes(state))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Not found" })),
            )
        })
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer())
                .layer(cors_layer(config)),
        )
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config).await?;
    let app = app(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind port {}: {e}", config.port)))?;

    tracing::info!("Server listening on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
