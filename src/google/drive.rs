//! Google Drive API v3 client.
//!
//! File content crosses the gateway base64-encoded in both directions.
//! Uploads are capped at 10 MiB of decoded payload, checked before any
//! network call is made.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ToolError;
use crate::google::client::GoogleClient;
use crate::tools::RequestContext;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const FILE_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,parents,webViewLink";

/// Maximum decoded upload payload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Reject an upload payload that exceeds the size cap.
pub fn ensure_upload_size(size: usize) -> Result<(), ToolError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ToolError::PayloadTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Decode a base64 upload body, enforcing the size cap before anything
/// touches the network.
pub fn decode_upload_content(content: &str) -> Result<Vec<u8>, ToolError> {
    let bytes = BASE64
        .decode(content.trim())
        .map_err(|e| ToolError::InvalidParameters(format!("content is not valid base64: {}", e)))?;
    ensure_upload_size(bytes.len())?;
    Ok(bytes)
}

/// Build a `multipart/related` upload body: JSON metadata part followed by
/// the raw content part.
fn build_multipart_related(metadata: &Value, mime_type: &str, content: &[u8], boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

/// Pick the upload MIME type: the caller's, or a guess from the file name.
pub fn upload_mime_type(name: &str, mime_type: Option<&str>) -> String {
    match mime_type {
        Some(m) => m.to_string(),
        None => mime_guess::from_path(name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Client for one caller's Drive operations.
pub struct DriveClient {
    client: GoogleClient,
}

impl DriveClient {
    pub fn new(ctx: &RequestContext) -> Result<Self, ToolError> {
        Ok(Self {
            client: GoogleClient::new(ctx)?,
        })
    }

    fn url(path: &str) -> String {
        format!("{}/{}", DRIVE_API_BASE, path)
    }

    /// List files matching a Drive search query.
    pub async fn list_files(
        &self,
        query: Option<&str>,
        page_size: Option<i64>,
        page_token: Option<&str>,
    ) -> Result<Value, ToolError> {
        let mut params = vec![format!("fields=nextPageToken,files({})", FILE_FIELDS)];
        if let Some(q) = query {
            params.push(format!("q={}", urlencoding::encode(q)));
        }
        if let Some(size) = page_size {
            params.push(format!("pageSize={}", size));
        }
        if let Some(token) = page_token {
            params.push(format!("pageToken={}", urlencoding::encode(token)));
        }

        self.client
            .get_json(&Self::url(&format!("files?{}", params.join("&"))))
            .await
    }

    /// Create a folder, optionally inside a parent.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Value, ToolError> {
        let mut body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });
        if let Some(parent) = parent_id {
            body["parents"] = json!([parent]);
        }

        self.client
            .send_json(
                Method::POST,
                &Self::url(&format!("files?fields={}", FILE_FIELDS)),
                &body,
            )
            .await
    }

    /// Upload file content via a multipart/related request. The payload
    /// must already have passed [`ensure_upload_size`].
    pub async fn upload_file(
        &self,
        name: &str,
        content: Vec<u8>,
        mime_type: &str,
        parent_id: Option<&str>,
    ) -> Result<Value, ToolError> {
        ensure_upload_size(content.len())?;

        let mut metadata = json!({
            "name": name,
            "mimeType": mime_type,
        });
        if let Some(parent) = parent_id {
            metadata["parents"] = json!([parent]);
        }

        let boundary = format!("sheetlink-{}", Uuid::new_v4());
        let body = build_multipart_related(&metadata, mime_type, &content, &boundary);

        let url = format!(
            "{}/files?uploadType=multipart&fields={}",
            DRIVE_UPLOAD_BASE, FILE_FIELDS
        );
        self.client.post_related(&url, &boundary, body).await
    }

    /// Download file content, returned base64-encoded.
    pub async fn download_file(&self, file_id: &str) -> Result<Value, ToolError> {
        let url = Self::url(&format!("files/{}?alt=media", urlencoding::encode(file_id)));
        let bytes = self.client.get_bytes(&url).await?;

        Ok(json!({
            "fileId": file_id,
            "size": bytes.len(),
            "content": BASE64.encode(&bytes),
        }))
    }

    /// Permanently delete a file.
    pub async fn delete_file(&self, file_id: &str) -> Result<Value, ToolError> {
        let url = Self::url(&format!("files/{}", urlencoding::encode(file_id)));
        self.client.delete(&url).await?;

        Ok(json!({
            "fileId": file_id,
            "deleted": true,
        }))
    }

    /// Get file metadata.
    pub async fn get_file(&self, file_id: &str) -> Result<Value, ToolError> {
        let url = Self::url(&format!(
            "files/{}?fields={}",
            urlencoding::encode(file_id),
            FILE_FIELDS
        ));
        self.client.get_json(&url).await
    }

    /// Share a file with a user by email.
    pub async fn share_file(
        &self,
        file_id: &str,
        email: &str,
        role: &str,
    ) -> Result<Value, ToolError> {
        let url = Self::url(&format!(
            "files/{}/permissions",
            urlencoding::encode(file_id)
        ));
        let body = json!({
            "type": "user",
            "role": role,
            "emailAddress": email,
        });
        self.client.send_json(Method::POST, &url, &body).await
    }

    /// Move a file to a new parent folder. The current parents are fetched
    /// first so they can be removed in the same update.
    pub async fn move_file(&self, file_id: &str, folder_id: &str) -> Result<Value, ToolError> {
        let current = self
            .client
            .get_json(&Self::url(&format!(
                "files/{}?fields=parents",
                urlencoding::encode(file_id)
            )))
            .await?;

        let previous_parents = current["parents"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();

        let mut url = Self::url(&format!(
            "files/{}?addParents={}&fields={}",
            urlencoding::encode(file_id),
            urlencoding::encode(folder_id),
            FILE_FIELDS
        ));
        if !previous_parents.is_empty() {
            url.push_str(&format!(
                "&removeParents={}",
                urlencoding::encode(&previous_parents)
            ));
        }

        self.client
            .send_json(Method::PATCH, &url, &json!({}))
            .await
    }

    /// Rename a file.
    pub async fn rename_file(&self, file_id: &str, name: &str) -> Result<Value, ToolError> {
        let url = Self::url(&format!(
            "files/{}?fields={}",
            urlencoding::encode(file_id),
            FILE_FIELDS
        ));
        self.client
            .send_json(Method::PATCH, &url, &json!({"name": name}))
            .await
    }
}
