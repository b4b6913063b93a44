//! Tool trait and types.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ToolError;

/// Per-request execution context.
///
/// Carries the caller's bearer token, constructed fresh for every dispatch
/// and dropped when the request completes. Tools build their own Google
/// clients from it, so no state or credentials outlive a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    token: SecretString,
}

impl RequestContext {
    /// Create a context around a caller-supplied access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            token: SecretString::from(token.into()),
        }
    }

    /// Id for correlating log lines within one dispatch.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The caller's access token, forwarded verbatim to Google.
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

/// Definition of a tool's interface: name, description, and a JSON Schema
/// for its parameters. This is what the manifest endpoint publishes.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Trait for the operations exposed through the dispatch endpoint.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &str;

    /// Get a description of what the tool does.
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters and the caller's
    /// credentials. The returned value is relayed to the caller verbatim.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: &RequestContext,
    ) -> Result<serde_json::Value, ToolError>;

    /// Get the schema triple published in the manifest.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_context_holds_token() {
        let ctx = RequestContext::new("ya29.token");
        assert_eq!(ctx.token().expose_secret(), "ya29.token");
    }

    #[test]
    fn test_context_debug_redacts_token() {
        let ctx = RequestContext::new("ya29.secret-token");
        let rendered = format!("{:?}", ctx);
        assert!(!rendered.contains("secret-token"));
    }
}
