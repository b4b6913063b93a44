//! Built-in tools: the fixed Google Sheets and Drive catalog.

mod drive;
mod sheets;

use std::sync::Arc;

pub use drive::{
    CreateFolderTool, DeleteFileTool, DownloadFileTool, GetFileTool, ListFilesTool, MoveFileTool,
    RenameFileTool, ShareFileTool, UploadFileTool,
};
pub use sheets::{
    AddSheetTool, AppendValuesTool, BatchUpdateTool, ClearValuesTool, CreateSpreadsheetTool,
    DeleteSheetTool, FormatCellsTool, GetSpreadsheetTool, ReadValuesTool, WriteValuesTool,
};

use crate::tools::registry::ToolRegistry;

/// Register the full built-in catalog. This list is the stable contract
/// advertised by the manifest endpoint.
pub fn register_all(registry: &mut ToolRegistry) {
    // Sheets
    registry.register(Arc::new(CreateSpreadsheetTool));
    registry.register(Arc::new(GetSpreadsheetTool));
    registry.register(Arc::new(ReadValuesTool));
    registry.register(Arc::new(WriteValuesTool));
    registry.register(Arc::new(AppendValuesTool));
    registry.register(Arc::new(ClearValuesTool));
    registry.register(Arc::new(AddSheetTool));
    registry.register(Arc::new(DeleteSheetTool));
    registry.register(Arc::new(FormatCellsTool));
    registry.register(Arc::new(BatchUpdateTool));

    // Drive
    registry.register(Arc::new(ListFilesTool));
    registry.register(Arc::new(CreateFolderTool));
    registry.register(Arc::new(UploadFileTool));
    registry.register(Arc::new(DeleteFileTool));
    registry.register(Arc::new(GetFileTool));
    registry.register(Arc::new(DownloadFileTool));
    registry.register(Arc::new(ShareFileTool));
    registry.register(Arc::new(MoveFileTool));
    registry.register(Arc::new(RenameFileTool));
}
