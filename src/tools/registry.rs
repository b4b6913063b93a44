//! Tool registry mapping tool names to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tools::builtin;
use crate::tools::tool::{Tool, ToolSchema};

/// Registry of available tools.
///
/// The catalog is fixed at startup and read-only afterwards, so a plain
/// map behind an `Arc` is enough — there is no cross-request mutation.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the full built-in catalog.
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        tracing::info!("Registered {} built-in tools", registry.count());
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        tracing::debug!("Registered tool: {}", name);
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// List all tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the schema triples for every tool, sorted by name for a stable
    /// manifest.
    pub fn manifest(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED_TOOLS: [&str; 19] = [
        "add_sheet",
        "append_values",
        "batch_update",
        "clear_values",
        "create_folder",
        "create_spreadsheet",
        "delete_file",
        "delete_sheet",
        "download_file",
        "format_cells",
        "get_file",
        "get_spreadsheet",
        "list_files",
        "move_file",
        "read_values",
        "rename_file",
        "share_file",
        "upload_file",
        "write_values",
    ];

    #[test]
    fn test_builtin_catalog_is_complete() {
        let registry = ToolRegistry::with_builtin_tools();
        assert_eq!(registry.count(), EXPECTED_TOOLS.len());
        for name in EXPECTED_TOOLS {
            assert!(registry.has(name), "missing tool {}", name);
        }
    }

    #[test]
    fn test_manifest_is_sorted_and_described() {
        let registry = ToolRegistry::with_builtin_tools();
        let manifest = registry.manifest();

        let names: Vec<&str> = manifest.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, EXPECTED_TOOLS);

        for schema in &manifest {
            assert!(!schema.description.is_empty(), "{} lacks a description", schema.name);
            assert_eq!(schema.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_get_unknown_tool_is_none() {
        let registry = ToolRegistry::with_builtin_tools();
        assert!(registry.get("frobnicate").is_none());
    }
}
