//! Google Sheets API v4 client.
//!
//! Value operations address cells with A1 range strings passed through to
//! the API; structural and formatting operations go through `batchUpdate`
//! with coordinate-based grid ranges. Responses are relayed to the caller
//! verbatim — no envelope, no schema normalization.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::google::client::GoogleClient;
use crate::google::range::GridRange;
use crate::tools::RequestContext;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Title and numeric id of one sheet (tab) within a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// Find a sheet's numeric id by exact, case-sensitive title match.
pub fn find_sheet_id(sheets: &[SheetProperties], title: &str) -> Result<i64, ToolError> {
    sheets
        .iter()
        .find(|s| s.title == title)
        .map(|s| s.sheet_id)
        .ok_or_else(|| ToolError::SheetNotFound {
            title: title.to_string(),
        })
}

fn parse_sheet_properties(v: &Value) -> SheetProperties {
    let props = &v["properties"];
    SheetProperties {
        sheet_id: props["sheetId"].as_i64().unwrap_or(0),
        title: props["title"].as_str().unwrap_or("").to_string(),
    }
}

/// Client for one caller's Sheets operations.
pub struct SheetsClient {
    client: GoogleClient,
}

impl SheetsClient {
    pub fn new(ctx: &RequestContext) -> Result<Self, ToolError> {
        Ok(Self {
            client: GoogleClient::new(ctx)?,
        })
    }

    fn url(path: &str) -> String {
        if path.is_empty() {
            SHEETS_API_BASE.to_string()
        } else {
            format!("{}/{}", SHEETS_API_BASE, path)
        }
    }

    /// Create a new spreadsheet with the given sheet (tab) names.
    pub async fn create_spreadsheet(
        &self,
        title: &str,
        sheet_names: &[String],
    ) -> Result<Value, ToolError> {
        let sheets: Vec<Value> = if sheet_names.is_empty() {
            vec![json!({"properties": {"title": "Sheet1"}})]
        } else {
            sheet_names
                .iter()
                .map(|name| json!({"properties": {"title": name}}))
                .collect()
        };

        let body = json!({
            "properties": {"title": title},
            "sheets": sheets,
        });

        self.client
            .send_json(Method::POST, &Self::url(""), &body)
            .await
    }

    /// Get spreadsheet metadata (no cell data).
    pub async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Value, ToolError> {
        let path = format!(
            "{}?fields=spreadsheetId,properties.title,spreadsheetUrl,sheets.properties,namedRanges",
            urlencoding::encode(spreadsheet_id)
        );
        self.client.get_json(&Self::url(&path)).await
    }

    /// Fetch the sheet list (title + id pairs only).
    pub async fn sheet_properties(
        &self,
        spreadsheet_id: &str,
    ) -> Result<Vec<SheetProperties>, ToolError> {
        let path = format!(
            "{}?fields=sheets.properties",
            urlencoding::encode(spreadsheet_id)
        );
        let parsed = self.client.get_json(&Self::url(&path)).await?;

        Ok(parsed["sheets"]
            .as_array()
            .map(|arr| arr.iter().map(parse_sheet_properties).collect())
            .unwrap_or_default())
    }

    /// Resolve a sheet title to its numeric id. Fresh metadata fetch on
    /// every call; lookups are not deduplicated within an operation.
    pub async fn lookup_sheet_id(
        &self,
        spreadsheet_id: &str,
        title: &str,
    ) -> Result<i64, ToolError> {
        let sheets = self.sheet_properties(spreadsheet_id).await?;
        find_sheet_id(&sheets, title)
    }

    /// Read values from a range.
    pub async fn read_values(&self, spreadsheet_id: &str, range: &str) -> Result<Value, ToolError> {
        let path = format!(
            "{}/values/{}",
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        );
        self.client.get_json(&Self::url(&path)).await
    }

    /// Write values to a range (overwrites).
    pub async fn write_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[Vec<Value>],
        value_input_option: &str,
    ) -> Result<Value, ToolError> {
        let path = format!(
            "{}/values/{}?valueInputOption={}",
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range),
            urlencoding::encode(value_input_option)
        );

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        self.client
            .send_json(Method::PUT, &Self::url(&path), &body)
            .await
    }

    /// Append rows after existing data in a range.
    pub async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &[Vec<Value>],
        value_input_option: &str,
    ) -> Result<Value, ToolError> {
        let path = format!(
            "{}/values/{}:append?valueInputOption={}&insertDataOption=INSERT_ROWS",
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range),
            urlencoding::encode(value_input_option)
        );

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        self.client
            .send_json(Method::POST, &Self::url(&path), &body)
            .await
    }

    /// Clear values from a range (keeps formatting).
    pub async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<Value, ToolError> {
        let path = format!(
            "{}/values/{}:clear",
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        );
        self.client
            .send_json(Method::POST, &Self::url(&path), &json!({}))
            .await
    }

    /// Send a raw batchUpdate request set.
    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> Result<Value, ToolError> {
        let path = format!("{}:batchUpdate", urlencoding::encode(spreadsheet_id));
        let body = json!({ "requests": requests });
        self.client
            .send_json(Method::POST, &Self::url(&path), &body)
            .await
    }

    /// Add a new sheet (tab).
    pub async fn add_sheet(&self, spreadsheet_id: &str, title: &str) -> Result<Value, ToolError> {
        self.batch_update(
            spreadsheet_id,
            vec![json!({
                "addSheet": {
                    "properties": {
                        "title": title
                    }
                }
            })],
        )
        .await
    }

    /// Delete a sheet (tab) by numeric id.
    pub async fn delete_sheet(
        &self,
        spreadsheet_id: &str,
        sheet_id: i64,
    ) -> Result<Value, ToolError> {
        self.batch_update(
            spreadsheet_id,
            vec![json!({
                "deleteSheet": {
                    "sheetId": sheet_id
                }
            })],
        )
        .await
    }
}

/// Formatting options for a repeatCell request.
#[derive(Debug, Default, Deserialize)]
pub struct CellFormatOptions {
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub font_size: Option<i64>,
    /// Text color as hex (e.g. "#FF0000").
    #[serde(default)]
    pub text_color: Option<String>,
    /// Background color as hex (e.g. "#FFFF00").
    #[serde(default)]
    pub background_color: Option<String>,
    /// "LEFT", "CENTER", or "RIGHT".
    #[serde(default)]
    pub horizontal_alignment: Option<String>,
    /// Number format pattern (e.g. "#,##0.00", "yyyy-mm-dd").
    #[serde(default)]
    pub number_format: Option<String>,
    /// "NUMBER", "CURRENCY", "PERCENT", "DATE", "TIME", "TEXT".
    #[serde(default)]
    pub number_format_type: Option<String>,
}

/// Build the `userEnteredFormat` cell payload and its field mask from the
/// requested options. Fails if no option was set.
pub fn build_cell_format(opts: &CellFormatOptions) -> Result<(Value, String), ToolError> {
    let mut format = json!({});
    let mut fields = Vec::new();

    let mut text_format = json!({});
    let mut has_text_format = false;

    if let Some(b) = opts.bold {
        text_format["bold"] = Value::Bool(b);
        has_text_format = true;
    }
    if let Some(i) = opts.italic {
        text_format["italic"] = Value::Bool(i);
        has_text_format = true;
    }
    if let Some(size) = opts.font_size {
        text_format["fontSize"] = json!(size);
        has_text_format = true;
    }
    if let Some(ref color) = opts.text_color {
        if let Some(c) = parse_hex_color(color) {
            text_format["foregroundColor"] = c;
            has_text_format = true;
        }
    }

    if has_text_format {
        format["textFormat"] = text_format;
        fields.push("userEnteredFormat.textFormat");
    }

    if let Some(ref color) = opts.background_color {
        if let Some(c) = parse_hex_color(color) {
            format["backgroundColor"] = c;
            fields.push("userEnteredFormat.backgroundColor");
        }
    }

    if let Some(ref align) = opts.horizontal_alignment {
        format["horizontalAlignment"] = Value::String(align.clone());
        fields.push("userEnteredFormat.horizontalAlignment");
    }

    if let Some(ref pattern) = opts.number_format {
        let fmt_type = opts.number_format_type.as_deref().unwrap_or("NUMBER");
        format["numberFormat"] = json!({
            "type": fmt_type,
            "pattern": pattern,
        });
        fields.push("userEnteredFormat.numberFormat");
    }

    if fields.is_empty() {
        return Err(ToolError::InvalidParameters(
            "no formatting options specified".to_string(),
        ));
    }

    Ok((format, fields.join(",")))
}

/// Assemble the repeatCell request for a resolved grid range.
pub fn repeat_cell_request(range: &GridRange, format: Value, fields: &str) -> Value {
    json!({
        "repeatCell": {
            "range": range,
            "cell": {
                "userEnteredFormat": format,
            },
            "fields": fields,
        }
    })
}

/// Parse a hex color like "#FF0000" into the API's 0.0-1.0 float triple.
fn parse_hex_color(hex: &str) -> Option<Value> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(json!({
        "red": f64::from(r) / 255.0,
        "green": f64::from(g) / 255.0,
        "blue": f64::from(b) / 255.0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_sheets() -> Vec<SheetProperties> {
        vec![
            SheetProperties {
                sheet_id: 0,
                title: "Sheet1".to_string(),
            },
            SheetProperties {
                sheet_id: 412,
                title: "My Sheet".to_string(),
            },
        ]
    }

    #[test]
    fn test_find_sheet_id_exact_match() {
        assert_eq!(find_sheet_id(&sample_sheets(), "Sheet1").unwrap(), 0);
        assert_eq!(find_sheet_id(&sample_sheets(), "My Sheet").unwrap(), 412);
    }

    #[test]
    fn test_find_sheet_id_is_case_sensitive() {
        let err = find_sheet_id(&sample_sheets(), "sheet1").unwrap_err();
        assert_eq!(err.kind(), "sheet_not_found");
    }

    #[test]
    fn test_find_sheet_id_missing_title() {
        let err = find_sheet_id(&sample_sheets(), "Budget").unwrap_err();
        assert_eq!(err.kind(), "sheet_not_found");
        assert!(err.to_string().contains("Budget"));
    }

    #[test]
    fn test_parse_sheet_properties_from_api_json() {
        let v = json!({
            "properties": {
                "sheetId": 42,
                "title": "Revenue",
                "index": 1,
                "gridProperties": {"rowCount": 1000, "columnCount": 26}
            }
        });
        assert_eq!(
            parse_sheet_properties(&v),
            SheetProperties {
                sheet_id: 42,
                title: "Revenue".to_string(),
            }
        );
    }

    #[test]
    fn test_build_cell_format_requires_an_option() {
        let err = build_cell_format(&CellFormatOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameters");
    }

    #[test]
    fn test_build_cell_format_bold_and_background() {
        let opts = CellFormatOptions {
            bold: Some(true),
            background_color: Some("#4285F4".to_string()),
            ..Default::default()
        };
        let (format, fields) = build_cell_format(&opts).unwrap();

        assert_eq!(format["textFormat"]["bold"], Value::Bool(true));
        assert!(format["backgroundColor"]["blue"].as_f64().unwrap() > 0.9);
        assert_eq!(
            fields,
            "userEnteredFormat.textFormat,userEnteredFormat.backgroundColor"
        );
    }

    #[test]
    fn test_build_cell_format_number_format_defaults_type() {
        let opts = CellFormatOptions {
            number_format: Some("#,##0.00".to_string()),
            ..Default::default()
        };
        let (format, fields) = build_cell_format(&opts).unwrap();
        assert_eq!(format["numberFormat"]["type"], "NUMBER");
        assert_eq!(fields, "userEnteredFormat.numberFormat");
    }

    #[test]
    fn test_repeat_cell_request_embeds_grid_range() {
        let grid = GridRange {
            sheet_id: 3,
            start_row_index: 0,
            end_row_index: 1,
            start_column_index: 0,
            end_column_index: 4,
        };
        let (format, fields) = build_cell_format(&CellFormatOptions {
            bold: Some(true),
            ..Default::default()
        })
        .unwrap();

        let request = repeat_cell_request(&grid, format, &fields);
        assert_eq!(request["repeatCell"]["range"]["sheetId"], 3);
        assert_eq!(request["repeatCell"]["range"]["endColumnIndex"], 4);
        assert_eq!(request["repeatCell"]["fields"], "userEnteredFormat.textFormat");
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#FF0000").unwrap();
        assert_eq!(c["red"], json!(1.0));
        assert_eq!(c["green"], json!(0.0));

        assert!(parse_hex_color("FF0000").is_some());
        assert!(parse_hex_color("#FFF").is_none());
        assert!(parse_hex_color("#GGGGGG").is_none());
    }
}
