//! HTTP surface for the gateway.
//!
//! Routes are assembled into a single axum router and served from one
//! listener with graceful shutdown. The gateway holds no per-connection
//! state; everything a request needs travels in its own context.

mod auth;
mod handlers;

pub use handlers::{manifest_body, AppState, InvokeRequest, ManifestResponse};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Maximum JSON body size. Upload tool bodies carry base64-encoded payloads
/// of at most 10 MiB decoded, plus request framing.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the gateway router with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/manifest", get(handlers::manifest))
        .route("/invoke", post(handlers::invoke))
        .route("/oauth/exchange", post(handlers::oauth_exchange))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::StartupFailed {
            reason: format!("Failed to bind to {}: {}", addr, e),
        })?;

    tracing::info!("Sheetlink listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .map_err(ServerError::Io)?;

    Ok(())
}
