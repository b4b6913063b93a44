//! Error types for Sheetlink.

/// Top-level error type for the gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Server lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server failed to start: {reason}")]
    StartupFailed { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised during a tool invocation.
///
/// A closed set of tagged kinds: everything a dispatch can fail with,
/// validation and downstream alike, is one of these variants. The dispatch
/// boundary converts each into a client-visible `{kind, message}` envelope,
/// so callers branch on `kind()` rather than parsing message text.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Missing bearer credential in Authorization header")]
    MissingCredential,

    #[error("Authorization header must be of the form 'Bearer <token>'")]
    MalformedCredential,

    #[error("Malformed range: {0}")]
    MalformedRange(String),

    #[error("No sheet named '{title}' in the spreadsheet")]
    SheetNotFound { title: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("External service error: {0}")]
    External(String),
}

impl ToolError {
    /// Stable machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::MissingCredential => "missing_credential",
            ToolError::MalformedCredential => "malformed_credential",
            ToolError::MalformedRange(_) => "malformed_range",
            ToolError::SheetNotFound { .. } => "sheet_not_found",
            ToolError::UnknownTool { .. } => "unknown_tool",
            ToolError::PayloadTooLarge { .. } => "payload_too_large",
            ToolError::InvalidParameters(_) => "invalid_parameters",
            ToolError::External(_) => "external",
        }
    }
}

/// Result type alias for the gateway.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(ToolError::MissingCredential.kind(), "missing_credential");
        assert_eq!(
            ToolError::UnknownTool {
                name: "nope".to_string()
            }
            .kind(),
            "unknown_tool"
        );
        assert_eq!(
            ToolError::MalformedRange("range must include a sheet name".to_string()).kind(),
            "malformed_range"
        );
        assert_eq!(
            ToolError::PayloadTooLarge {
                size: 11,
                limit: 10
            }
            .kind(),
            "payload_too_large"
        );
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ToolError::SheetNotFound {
            title: "Budget".to_string(),
        };
        assert!(err.to_string().contains("Budget"));

        let err = ToolError::UnknownTool {
            name: "frobnicate".to_string(),
        };
        assert!(err.to_string().contains("frobnicate"));
    }
}
