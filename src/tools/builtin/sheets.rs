//! Google Sheets tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::google::range::resolve_range;
use crate::google::sheets::{
    build_cell_format, repeat_cell_request, CellFormatOptions, SheetsClient,
};
use crate::tools::tool::{RequestContext, Tool};

fn default_value_input_option() -> String {
    "USER_ENTERED".to_string()
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// Create a new spreadsheet.
pub struct CreateSpreadsheetTool;

#[derive(Debug, Deserialize)]
struct CreateSpreadsheetParams {
    title: String,
    #[serde(default)]
    sheet_names: Vec<String>,
}

#[async_trait]
impl Tool for CreateSpreadsheetTool {
    fn name(&self) -> &str {
        "create_spreadsheet"
    }

    fn description(&self) -> &str {
        "Create a new Google Spreadsheet with optional sheet (tab) names. \
         Returns the new spreadsheet's id, URL, and sheet list."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Spreadsheet title"
                },
                "sheet_names": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Names for sheets (tabs). Defaults to ['Sheet1'] if omitted."
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: CreateSpreadsheetParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.create_spreadsheet(&p.title, &p.sheet_names).await
    }
}

/// Get spreadsheet metadata.
pub struct GetSpreadsheetTool;

#[derive(Debug, Deserialize)]
struct GetSpreadsheetParams {
    spreadsheet_id: String,
}

#[async_trait]
impl Tool for GetSpreadsheetTool {
    fn name(&self) -> &str {
        "get_spreadsheet"
    }

    fn description(&self) -> &str {
        "Get spreadsheet metadata: title, URL, sheets (tabs) with their numeric ids, \
         and named ranges. No cell data."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID (same as the Google Drive file ID)"
                }
            },
            "required": ["spreadsheet_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: GetSpreadsheetParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.get_spreadsheet(&p.spreadsheet_id).await
    }
}

/// Read cell values from a range.
pub struct ReadValuesTool;

#[derive(Debug, Deserialize)]
struct ReadValuesParams {
    spreadsheet_id: String,
    range: String,
}

#[async_trait]
impl Tool for ReadValuesTool {
    fn name(&self) -> &str {
        "read_values"
    }

    fn description(&self) -> &str {
        "Read cell values from a range in A1 notation (e.g. 'Sheet1!A1:D10')."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "range": {
                    "type": "string",
                    "description": "A1 notation range (e.g. 'Sheet1!A1:D10')"
                }
            },
            "required": ["spreadsheet_id", "range"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: ReadValuesParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.read_values(&p.spreadsheet_id, &p.range).await
    }
}

/// Write values to a range.
pub struct WriteValuesTool;

#[derive(Debug, Deserialize)]
struct WriteValuesParams {
    spreadsheet_id: String,
    range: String,
    values: Vec<Vec<Value>>,
    #[serde(default = "default_value_input_option")]
    value_input_option: String,
}

#[async_trait]
impl Tool for WriteValuesTool {
    fn name(&self) -> &str {
        "write_values"
    }

    fn description(&self) -> &str {
        "Write a 2D array of values to a range, overwriting existing data. \
         USER_ENTERED (default) parses input like typing in the UI; RAW stores as-is."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "range": {
                    "type": "string",
                    "description": "A1 notation range (e.g. 'Sheet1!A1')"
                },
                "values": {
                    "type": "array",
                    "items": { "type": "array" },
                    "description": "2D array of values (rows of columns)"
                },
                "value_input_option": {
                    "type": "string",
                    "enum": ["RAW", "USER_ENTERED"],
                    "description": "How to interpret input (default: USER_ENTERED)",
                    "default": "USER_ENTERED"
                }
            },
            "required": ["spreadsheet_id", "range", "values"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: WriteValuesParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets
            .write_values(&p.spreadsheet_id, &p.range, &p.values, &p.value_input_option)
            .await
    }
}

/// Append rows after existing data.
pub struct AppendValuesTool;

#[async_trait]
impl Tool for AppendValuesTool {
    fn name(&self) -> &str {
        "append_values"
    }

    fn description(&self) -> &str {
        "Append rows after the last row of existing data in a range \
         (e.g. range 'Sheet1!A:E' finds the table in those columns)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "range": {
                    "type": "string",
                    "description": "A1 notation range locating the table (e.g. 'Sheet1!A:E')"
                },
                "values": {
                    "type": "array",
                    "items": { "type": "array" },
                    "description": "Rows to append (2D array)"
                },
                "value_input_option": {
                    "type": "string",
                    "enum": ["RAW", "USER_ENTERED"],
                    "description": "How to interpret input (default: USER_ENTERED)",
                    "default": "USER_ENTERED"
                }
            },
            "required": ["spreadsheet_id", "range", "values"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: WriteValuesParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets
            .append_values(&p.spreadsheet_id, &p.range, &p.values, &p.value_input_option)
            .await
    }
}

/// Clear values from a range.
pub struct ClearValuesTool;

#[async_trait]
impl Tool for ClearValuesTool {
    fn name(&self) -> &str {
        "clear_values"
    }

    fn description(&self) -> &str {
        "Clear values from a range. Formatting is kept."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "range": {
                    "type": "string",
                    "description": "A1 notation range to clear"
                }
            },
            "required": ["spreadsheet_id", "range"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: ReadValuesParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.clear_values(&p.spreadsheet_id, &p.range).await
    }
}

/// Add a new sheet (tab).
pub struct AddSheetTool;

#[derive(Debug, Deserialize)]
struct AddSheetParams {
    spreadsheet_id: String,
    title: String,
}

#[async_trait]
impl Tool for AddSheetTool {
    fn name(&self) -> &str {
        "add_sheet"
    }

    fn description(&self) -> &str {
        "Add a new sheet (tab) to an existing spreadsheet."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "title": {
                    "type": "string",
                    "description": "Name for the new sheet (tab)"
                }
            },
            "required": ["spreadsheet_id", "title"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: AddSheetParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.add_sheet(&p.spreadsheet_id, &p.title).await
    }
}

/// Delete a sheet (tab).
pub struct DeleteSheetTool;

#[derive(Debug, Deserialize)]
struct DeleteSheetParams {
    spreadsheet_id: String,
    sheet_id: i64,
}

#[async_trait]
impl Tool for DeleteSheetTool {
    fn name(&self) -> &str {
        "delete_sheet"
    }

    fn description(&self) -> &str {
        "Delete a sheet (tab) by its numeric sheet id (from get_spreadsheet, \
         NOT the sheet name)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "sheet_id": {
                    "type": "integer",
                    "description": "Numeric sheet ID (get from get_spreadsheet)"
                }
            },
            "required": ["spreadsheet_id", "sheet_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: DeleteSheetParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.delete_sheet(&p.spreadsheet_id, p.sheet_id).await
    }
}

/// Format cells in an A1-notation range.
pub struct FormatCellsTool;

#[derive(Debug, Deserialize)]
struct FormatCellsParams {
    spreadsheet_id: String,
    /// Must include the sheet name: formatting is coordinate-based, so the
    /// range is resolved to a numeric grid range first.
    range: String,
    #[serde(flatten)]
    format: CellFormatOptions,
}

#[async_trait]
impl Tool for FormatCellsTool {
    fn name(&self) -> &str {
        "format_cells"
    }

    fn description(&self) -> &str {
        "Format cells in a range (bold, italic, font size, colors, alignment, \
         number format). The range must include the sheet name, e.g. 'Sheet1!A1:D1'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "range": {
                    "type": "string",
                    "description": "A1 notation range including the sheet name (e.g. 'Sheet1!A1:D1')"
                },
                "bold": {
                    "type": "boolean",
                    "description": "Make text bold"
                },
                "italic": {
                    "type": "boolean",
                    "description": "Make text italic"
                },
                "font_size": {
                    "type": "integer",
                    "description": "Font size in points"
                },
                "text_color": {
                    "type": "string",
                    "description": "Text color as hex (e.g. '#FF0000')"
                },
                "background_color": {
                    "type": "string",
                    "description": "Cell background color as hex (e.g. '#FFFF00')"
                },
                "horizontal_alignment": {
                    "type": "string",
                    "enum": ["LEFT", "CENTER", "RIGHT"],
                    "description": "Horizontal text alignment"
                },
                "number_format": {
                    "type": "string",
                    "description": "Number format pattern (e.g. '#,##0.00', 'yyyy-mm-dd')"
                },
                "number_format_type": {
                    "type": "string",
                    "enum": ["NUMBER", "CURRENCY", "PERCENT", "DATE", "TIME", "TEXT"],
                    "description": "Type of number format (default: NUMBER)"
                }
            },
            "required": ["spreadsheet_id", "range"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: FormatCellsParams = parse_params(params)?;

        // Validate the format options before touching the network.
        let (format, fields) = build_cell_format(&p.format)?;

        let sheets = SheetsClient::new(ctx)?;
        let grid = resolve_range(&sheets, &p.spreadsheet_id, &p.range).await?;
        let request = repeat_cell_request(&grid, format, &fields);
        sheets.batch_update(&p.spreadsheet_id, vec![request]).await
    }
}

/// Raw batchUpdate passthrough.
pub struct BatchUpdateTool;

#[derive(Debug, Deserialize)]
struct BatchUpdateParams {
    spreadsheet_id: String,
    requests: Vec<Value>,
}

#[async_trait]
impl Tool for BatchUpdateTool {
    fn name(&self) -> &str {
        "batch_update"
    }

    fn description(&self) -> &str {
        "Send raw Sheets batchUpdate requests for administrative operations \
         not covered by the other tools. Requests use the Sheets API request \
         schema verbatim."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spreadsheet_id": {
                    "type": "string",
                    "description": "The spreadsheet ID"
                },
                "requests": {
                    "type": "array",
                    "items": { "type": "object" },
                    "description": "Sheets API batchUpdate request objects"
                }
            },
            "required": ["spreadsheet_id", "requests"]
        })
    }

    async fn execute(&self, params: Value, ctx: &RequestContext) -> Result<Value, ToolError> {
        let p: BatchUpdateParams = parse_params(params)?;
        let sheets = SheetsClient::new(ctx)?;
        sheets.batch_update(&p.spreadsheet_id, p.requests).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_params_default_input_option() {
        let p: WriteValuesParams = serde_json::from_value(json!({
            "spreadsheet_id": "abc",
            "range": "Sheet1!A1",
            "values": [["x"]]
        }))
        .unwrap();
        assert_eq!(p.value_input_option, "USER_ENTERED");
    }

    #[test]
    fn test_format_params_flatten_options() {
        let p: FormatCellsParams = serde_json::from_value(json!({
            "spreadsheet_id": "abc",
            "range": "Sheet1!A1:D1",
            "bold": true,
            "background_color": "#4285F4"
        }))
        .unwrap();
        assert_eq!(p.format.bold, Some(true));
        assert_eq!(p.format.background_color.as_deref(), Some("#4285F4"));
    }

    #[test]
    fn test_missing_required_param_is_invalid() {
        let result: Result<ReadValuesParams, ToolError> =
            parse_params(json!({"spreadsheet_id": "abc"}));
        assert_eq!(result.unwrap_err().kind(), "invalid_parameters");
    }
}
