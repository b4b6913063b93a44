//! OAuth 2.0 code-for-token exchange.
//!
//! The gateway never manages token lifecycles; it only shapes the
//! authorization-code grant request around the configured token endpoint
//! and relays the response to the caller verbatim.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::OAuthConfig;
use crate::error::ToolError;

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the form parameters for the authorization-code grant.
fn exchange_params(oauth: &OAuthConfig, code: &str, redirect_uri: &str) -> Vec<(&'static str, String)> {
    vec![
        ("grant_type", "authorization_code".to_string()),
        ("code", code.to_string()),
        ("client_id", oauth.client_id.clone()),
        ("client_secret", oauth.client_secret.expose_secret().to_string()),
        ("redirect_uri", redirect_uri.to_string()),
    ]
}

/// Exchange an authorization code for an access token at the configured
/// token endpoint.
pub async fn exchange_code(
    oauth: &OAuthConfig,
    code: &str,
    redirect_uri: Option<&str>,
) -> Result<Value, ToolError> {
    let redirect_uri = redirect_uri
        .map(str::to_string)
        .or_else(|| oauth.redirect_uris.first().cloned())
        .unwrap_or_default();

    let client = reqwest::Client::builder()
        .timeout(EXCHANGE_TIMEOUT)
        .build()
        .map_err(|e| ToolError::External(format!("failed to build HTTP client: {}", e)))?;

    let params = exchange_params(oauth, code, &redirect_uri);
    let response = client
        .post(&oauth.token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| ToolError::External(format!("token exchange failed: {}", e)))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(ToolError::External(format!(
            "token exchange failed: HTTP {} - {}",
            status.as_u16(),
            body
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| ToolError::External(format!("invalid token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEFAULT_AUTH_URI, DEFAULT_REDIRECT_URI, DEFAULT_TOKEN_URI, OAUTH_SCOPES,
    };

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "hunter2".to_string().into(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            redirect_uris: vec![DEFAULT_REDIRECT_URI.to_string()],
            scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_exchange_params_shape() {
        let oauth = test_config();
        let params = exchange_params(&oauth, "auth-code", "http://localhost/cb");

        assert_eq!(params[0], ("grant_type", "authorization_code".to_string()));
        assert!(params.contains(&("code", "auth-code".to_string())));
        assert!(params.contains(&("client_id", "client-123".to_string())));
        assert!(params.contains(&("client_secret", "hunter2".to_string())));
        assert!(params.contains(&("redirect_uri", "http://localhost/cb".to_string())));
    }
}
