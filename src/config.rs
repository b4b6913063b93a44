//! Configuration for Sheetlink.
//!
//! Settings are loaded once at startup (env var > default) and passed into
//! the server as an explicit object; nothing below the entry point reads
//! ambient process state. Every OAuth field has a documented placeholder
//! default so the server can boot (and the manifest can render) before real
//! client credentials are configured.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Placeholder client id used when `GOOGLE_CLIENT_ID` is unset.
pub const PLACEHOLDER_CLIENT_ID: &str = "unconfigured-client-id";

/// Placeholder client secret used when `GOOGLE_CLIENT_SECRET` is unset.
pub const PLACEHOLDER_CLIENT_SECRET: &str = "unconfigured-client-secret";

/// Google's OAuth 2.0 authorization endpoint.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Default redirect URI when `GOOGLE_REDIRECT_URI` is unset.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/oauth/callback";

/// Scopes requested from Google: spreadsheet read/write, drive read/write,
/// and drive file-scoped access.
pub const OAUTH_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/drive.file",
];

/// Main configuration for the gateway.
#[derive(Debug, Clone)]
pub struct Config {
    pub oauth: OAuthConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `.env` files should already have been loaded (via dotenvy) by the
    /// entry point before this is called.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            oauth: OAuthConfig::resolve(),
            server: ServerConfig::resolve()?,
        })
    }
}

/// OAuth client settings relayed to tool-callers via the manifest and used
/// by the code-for-token exchange.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client id (`GOOGLE_CLIENT_ID`).
    pub client_id: String,
    /// OAuth client secret (`GOOGLE_CLIENT_SECRET`).
    pub client_secret: SecretString,
    /// Authorization endpoint (`GOOGLE_AUTH_URI`).
    pub auth_uri: String,
    /// Token endpoint (`GOOGLE_TOKEN_URI`).
    pub token_uri: String,
    /// Registered redirect URIs (`GOOGLE_REDIRECT_URI`, comma-separated).
    pub redirect_uris: Vec<String>,
    /// Scope list requested during authorization.
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    fn resolve() -> Self {
        let client_id =
            optional_env("GOOGLE_CLIENT_ID").unwrap_or_else(|| PLACEHOLDER_CLIENT_ID.to_string());
        let client_secret = optional_env("GOOGLE_CLIENT_SECRET")
            .unwrap_or_else(|| PLACEHOLDER_CLIENT_SECRET.to_string());
        let auth_uri =
            optional_env("GOOGLE_AUTH_URI").unwrap_or_else(|| DEFAULT_AUTH_URI.to_string());
        let token_uri =
            optional_env("GOOGLE_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());
        let redirect_uris = optional_env("GOOGLE_REDIRECT_URI")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_REDIRECT_URI.to_string()]);

        Self {
            client_id,
            client_secret: client_secret.into(),
            auth_uri,
            token_uri,
            redirect_uris,
            scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether real client credentials have been configured.
    pub fn is_configured(&self) -> bool {
        self.client_id != PLACEHOLDER_CLIENT_ID
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (`SHEETLINK_HOST`, default 127.0.0.1).
    pub host: String,
    /// Bind port (`SHEETLINK_PORT`, default 8080).
    pub port: u16,
}

impl ServerConfig {
    fn resolve() -> Result<Self, ConfigError> {
        let host = optional_env("SHEETLINK_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match optional_env("SHEETLINK_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SHEETLINK_PORT".to_string(),
                message: format!("'{}' is not a valid port number", raw),
            })?,
            None => 8080,
        };

        Ok(Self { host, port })
    }
}

/// Read an env var, treating empty strings as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_list_is_fixed() {
        assert_eq!(OAUTH_SCOPES.len(), 3);
        assert!(OAUTH_SCOPES.iter().all(|s| s.starts_with("https://")));
        assert!(OAUTH_SCOPES.contains(&"https://www.googleapis.com/auth/drive.file"));
    }

    #[test]
    fn test_placeholder_config_is_unconfigured() {
        let oauth = OAuthConfig {
            client_id: PLACEHOLDER_CLIENT_ID.to_string(),
            client_secret: PLACEHOLDER_CLIENT_SECRET.to_string().into(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            redirect_uris: vec![DEFAULT_REDIRECT_URI.to_string()],
            scopes: OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
        };
        assert!(!oauth.is_configured());
    }
}
