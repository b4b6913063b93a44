//! Request handlers: dispatch, manifest, OAuth exchange, health.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::ToolError;
use crate::oauth;
use crate::server::auth;
use crate::tools::{RequestContext, Tool, ToolRegistry, ToolSchema};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub config: Arc<Config>,
}

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    /// Name of the tool to invoke.
    pub tool: String,
    /// Arguments object passed to the tool.
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service: String,
}

/// The manifest: every tool's schema plus the OAuth parameters a caller
/// needs to obtain credentials.
#[derive(Debug, Serialize)]
pub struct ManifestResponse {
    pub tools: Vec<ToolSchema>,
    pub oauth: OAuthParameters,
}

#[derive(Debug, Serialize)]
pub struct OAuthParameters {
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
}

/// Build the manifest body. Also used by the CLI `manifest` subcommand.
pub fn manifest_body(registry: &ToolRegistry, config: &Config) -> ManifestResponse {
    ManifestResponse {
        tools: registry.manifest(),
        oauth: OAuthParameters {
            client_id: config.oauth.client_id.clone(),
            auth_uri: config.oauth.auth_uri.clone(),
            token_uri: config.oauth.token_uri.clone(),
            redirect_uris: config.oauth.redirect_uris.clone(),
            scopes: config.oauth.scopes.clone(),
        },
    }
}

fn status_for(err: &ToolError) -> StatusCode {
    match err {
        ToolError::MissingCredential | ToolError::MalformedCredential => StatusCode::UNAUTHORIZED,
        ToolError::MalformedRange(_) | ToolError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
        ToolError::SheetNotFound { .. } | ToolError::UnknownTool { .. } => StatusCode::NOT_FOUND,
        ToolError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ToolError::External(_) => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: &ToolError) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            kind: err.kind(),
            message: err.to_string(),
        },
    };
    (status_for(err), Json(body)).into_response()
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "sheetlink".to_string(),
    })
}

pub async fn manifest(State(state): State<AppState>) -> impl IntoResponse {
    Json(manifest_body(&state.registry, &state.config))
}

/// The dispatch endpoint: look up the tool by name and run it with the
/// caller's credentials.
pub async fn invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<InvokeRequest>,
) -> Response {
    let tool_name = req.tool.clone();
    match dispatch(&state.registry, &headers, req).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            tracing::warn!(tool = %tool_name, kind = err.kind(), "Tool invocation failed: {}", err);
            error_response(&err)
        }
    }
}

/// Look up and execute a tool. This is the single catch point: every
/// failure in validation, lookup, or the external call lands here and is
/// converted into one error envelope.
pub async fn dispatch(
    registry: &ToolRegistry,
    headers: &HeaderMap,
    req: InvokeRequest,
) -> Result<Value, ToolError> {
    let token = auth::bearer_token(headers)?;

    let tool = registry.get(&req.tool).ok_or_else(|| ToolError::UnknownTool {
        name: req.tool.clone(),
    })?;

    let ctx = RequestContext::new(token);
    tracing::info!(request_id = %ctx.request_id(), tool = %req.tool, "Invoking tool");

    tool.execute(req.arguments, &ctx).await
}

/// Exchange an OAuth authorization code for an access token.
pub async fn oauth_exchange(
    State(state): State<AppState>,
    Json(req): Json<ExchangeRequest>,
) -> Response {
    match oauth::exchange_code(&state.config.oauth, &req.code, req.redirect_uri.as_deref()).await {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(err) => {
            tracing::warn!(kind = err.kind(), "OAuth exchange failed: {}", err);
            error_response(&err)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    /// Authorization code returned by the consent redirect.
    pub code: String,
    /// Redirect URI used in the authorization request; defaults to the
    /// first configured one.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};
    use serde_json::json;

    fn bearer_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer test-token"),
        );
        headers
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_fails_without_external_call() {
        let registry = ToolRegistry::with_builtin_tools();
        let err = dispatch(
            &registry,
            &bearer_headers(),
            InvokeRequest {
                tool: "frobnicate".to_string(),
                arguments: json!({}),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "unknown_tool");
        assert_eq!(status_for(&err), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_requires_credentials_before_lookup() {
        let registry = ToolRegistry::with_builtin_tools();
        let err = dispatch(
            &registry,
            &HeaderMap::new(),
            InvokeRequest {
                tool: "read_values".to_string(),
                arguments: json!({}),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "missing_credential");
        assert_eq!(status_for(&err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_dispatch_malformed_range_is_local() {
        // format_cells validates its range reference before any metadata
        // fetch; a span without a sheet name never reaches the network.
        let registry = ToolRegistry::with_builtin_tools();
        let err = dispatch(
            &registry,
            &bearer_headers(),
            InvokeRequest {
                tool: "format_cells".to_string(),
                arguments: json!({
                    "spreadsheet_id": "abc",
                    "range": "A1:B2",
                    "bold": true
                }),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "malformed_range");
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ToolError::PayloadTooLarge { size: 1, limit: 0 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(&ToolError::External("boom".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&ToolError::SheetNotFound {
                title: "x".to_string()
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_manifest_body_carries_oauth_parameters() {
        let registry = ToolRegistry::with_builtin_tools();
        let config = crate::config::Config {
            oauth: crate::config::OAuthConfig {
                client_id: "client-123".to_string(),
                client_secret: "secret".to_string().into(),
                auth_uri: crate::config::DEFAULT_AUTH_URI.to_string(),
                token_uri: crate::config::DEFAULT_TOKEN_URI.to_string(),
                redirect_uris: vec![crate::config::DEFAULT_REDIRECT_URI.to_string()],
                scopes: crate::config::OAUTH_SCOPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            server: crate::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
        };

        let manifest = manifest_body(&registry, &config);
        assert_eq!(manifest.tools.len(), registry.count());
        assert_eq!(manifest.oauth.client_id, "client-123");
        assert_eq!(manifest.oauth.scopes.len(), 3);
    }
}
