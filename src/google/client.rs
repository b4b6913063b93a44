//! Shared plumbing for Google REST calls.
//!
//! Each request constructs its own client from the caller's bearer token;
//! nothing is pooled or cached across requests. Non-2xx responses surface
//! as a generic external-service error carrying the status and body text —
//! permission, quota, and network failures are deliberately not
//! distinguished from each other.

use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::error::ToolError;
use crate::tools::RequestContext;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client bound to one caller's access token.
pub struct GoogleClient {
    http: reqwest::Client,
    token: SecretString,
}

impl GoogleClient {
    /// Build a client for the current request's credentials.
    pub fn new(ctx: &RequestContext) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ToolError::External(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token: ctx.token().clone(),
        })
    }

    /// GET a JSON document.
    pub async fn get_json(&self, url: &str) -> Result<Value, ToolError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(request_error)?;
        into_json(response).await
    }

    /// Send a JSON body and parse the JSON response.
    pub async fn send_json(&self, method: Method, url: &str, body: &Value) -> Result<Value, ToolError> {
        let response = self
            .http
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        into_json(response).await
    }

    /// GET raw bytes (media downloads).
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ToolError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        Ok(response.bytes().await.map_err(request_error)?.to_vec())
    }

    /// DELETE a resource; Google answers these with an empty 204.
    pub async fn delete(&self, url: &str) -> Result<(), ToolError> {
        let response = self
            .http
            .delete(url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }
        Ok(())
    }

    /// POST a pre-built `multipart/related` body (Drive uploads).
    pub async fn post_related(
        &self,
        url: &str,
        boundary: &str,
        body: Vec<u8>,
    ) -> Result<Value, ToolError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(request_error)?;
        into_json(response).await
    }
}

async fn into_json(response: reqwest::Response) -> Result<Value, ToolError> {
    let status = response.status();
    let body = response.text().await.map_err(request_error)?;

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body)
        .map_err(|e| ToolError::External(format!("failed to parse response: {}", e)))
}

fn status_error(status: u16, body: &str) -> ToolError {
    ToolError::External(format!("Google API returned status {}: {}", status, body))
}

fn request_error(err: reqwest::Error) -> ToolError {
    ToolError::External(err.to_string())
}
