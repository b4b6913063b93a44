//! Google Drive tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::google::drive::{decode_upload_content, upload_mime_type, DriveClient};
use crate::tools::tool::{RequestContext, Tool};

fn default_share_role() -> String {
    "reader".to_string()
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// Search or list Drive files.
pub struct ListFilesTool;

#[derive(Debug, Deserialize)]
struct ListFilesParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    page_size: Option<i64>,
    #[serde(default)]
    page_token: Option<String>,
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "Search or list Google Drive files with Drive query syntax \
         (e.g. \"name contains 'report'\", \"'folderId' in parents\")."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Drive search query (e.g. \"name contains 'report'\")"
                },
                "page_size": {
                    "type": "integer",
                    "description": "Max results per page"
                },
                "page_token": {
                    "type": "string",
                    "description": "Token for the next page of results"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: ListFilesParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive
            .list_files(p.query.as_deref(), p.page_size, p.page_token.as_deref())
            .await
    }
}

/// Create a folder.
pub struct CreateFolderTool;

#[derive(Debug, Deserialize)]
struct CreateFolderParams {
    name: String,
    #[serde(default)]
    parent_id: Option<String>,
}

#[async_trait]
impl Tool for CreateFolderTool {
    fn name(&self) -> &str {
        "create_folder"
    }

    fn description(&self) -> &str {
        "Create a new Google Drive folder, optionally inside a parent folder."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Folder name"
                },
                "parent_id": {
                    "type": "string",
                    "description": "Parent folder ID (omit for the Drive root)"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: CreateFolderParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.create_folder(&p.name, p.parent_id.as_deref()).await
    }
}

/// Upload a file.
pub struct UploadFileTool;

#[derive(Debug, Deserialize)]
struct UploadFileParams {
    name: String,
    /// Base64-encoded file content, at most 10 MiB decoded.
    content: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    parent_id: Option<String>,
}

#[async_trait]
impl Tool for UploadFileTool {
    fn name(&self) -> &str {
        "upload_file"
    }

    fn description(&self) -> &str {
        "Upload a file to Google Drive. Content is base64-encoded and limited \
         to 10 MiB decoded. The MIME type is guessed from the file name when \
         not given."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "File name"
                },
                "content": {
                    "type": "string",
                    "description": "Base64-encoded file content (max 10 MiB decoded)"
                },
                "mime_type": {
                    "type": "string",
                    "description": "MIME type (guessed from the name if omitted)"
                },
                "parent_id": {
                    "type": "string",
                    "description": "Parent folder ID (omit for the Drive root)"
                }
            },
            "required": ["name", "content"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: UploadFileParams = parse_params(params)?;

        // Decode and size-check before any external call.
        let bytes = decode_upload_content(&p.content)?;
        let mime_type = upload_mime_type(&p.name, p.mime_type.as_deref());

        let drive = DriveClient::new(ctx)?;
        drive
            .upload_file(&p.name, bytes, &mime_type, p.parent_id.as_deref())
            .await
    }
}

/// Permanently delete a file.
pub struct DeleteFileTool;

#[derive(Debug, Deserialize)]
struct FileIdParams {
    file_id: String,
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Permanently delete a Google Drive file. Does not use the trash."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID to delete"
                }
            },
            "required": ["file_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: FileIdParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.delete_file(&p.file_id).await
    }
}

/// Get file metadata.
pub struct GetFileTool;

#[async_trait]
impl Tool for GetFileTool {
    fn name(&self) -> &str {
        "get_file"
    }

    fn description(&self) -> &str {
        "Get metadata for a Google Drive file: name, MIME type, size, \
         timestamps, parents, and web link."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID"
                }
            },
            "required": ["file_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: FileIdParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.get_file(&p.file_id).await
    }
}

/// Download file content.
pub struct DownloadFileTool;

#[async_trait]
impl Tool for DownloadFileTool {
    fn name(&self) -> &str {
        "download_file"
    }

    fn description(&self) -> &str {
        "Download a Google Drive file's content, returned base64-encoded."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID to download"
                }
            },
            "required": ["file_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: FileIdParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.download_file(&p.file_id).await
    }
}

/// Share a file with a user.
pub struct ShareFileTool;

#[derive(Debug, Deserialize)]
struct ShareFileParams {
    file_id: String,
    email: String,
    #[serde(default = "default_share_role")]
    role: String,
}

#[async_trait]
impl Tool for ShareFileTool {
    fn name(&self) -> &str {
        "share_file"
    }

    fn description(&self) -> &str {
        "Share a Google Drive file with a user by email. Roles: reader, \
         commenter, writer, organizer (default: reader)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID to share"
                },
                "email": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "role": {
                    "type": "string",
                    "enum": ["reader", "commenter", "writer", "organizer"],
                    "description": "Permission level (default: reader)",
                    "default": "reader"
                }
            },
            "required": ["file_id", "email"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: ShareFileParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.share_file(&p.file_id, &p.email, &p.role).await
    }
}

/// Move a file to another folder.
pub struct MoveFileTool;

#[derive(Debug, Deserialize)]
struct MoveFileParams {
    file_id: String,
    folder_id: String,
}

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move a Google Drive file into another folder, replacing its current \
         parents."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID to move"
                },
                "folder_id": {
                    "type": "string",
                    "description": "Destination folder ID"
                }
            },
            "required": ["file_id", "folder_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: MoveFileParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.move_file(&p.file_id, &p.folder_id).await
    }
}

/// Rename a file.
pub struct RenameFileTool;

#[derive(Debug, Deserialize)]
struct RenameFileParams {
    file_id: String,
    name: String,
}

#[async_trait]
impl Tool for RenameFileTool {
    fn name(&self) -> &str {
        "rename_file"
    }

    fn description(&self) -> &str {
        "Rename a Google Drive file."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_id": {
                    "type": "string",
                    "description": "The file ID to rename"
                },
                "name": {
                    "type": "string",
                    "description": "New file name"
                }
            },
            "required": ["file_id", "name"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: RenameFileParams = parse_params(params)?;
        let drive = DriveClient::new(ctx)?;
        drive.rename_file(&p.file_id, &p.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use crate::google::drive::MAX_UPLOAD_BYTES;
    use crate::tools::tool::RequestContext;

    #[test]
    fn test_share_role_defaults_to_reader() {
        let p: ShareFileParams = serde_json::from_value(json!({
            "file_id": "abc",
            "email": "alice@example.com"
        }))
        .unwrap();
        assert_eq!(p.role, "reader");
    }

    #[tokio::test]
    async fn test_oversized_upload_fails_before_any_network_call() {
        // An upload one byte over the cap must be rejected during local
        // validation; the placeholder token would fail any real call.
        let content = BASE64.encode(vec![0u8; MAX_UPLOAD_BYTES + 1]);
        let ctx = RequestContext::new("test-token");

        let err = UploadFileTool
            .execute(
                json!({"name": "big.bin", "content": content}),
                &ctx,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "payload_too_large");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_base64() {
        let ctx = RequestContext::new("test-token");
        let err = UploadFileTool
            .execute(
                json!({"name": "a.txt", "content": "%%% not base64 %%%"}),
                &ctx,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_parameters");
    }
}
