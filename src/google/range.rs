//! A1-notation range resolution.
//!
//! Coordinate-based Sheets operations (cell formatting, structural updates)
//! address cells by numeric sheet id and zero-based half-open indexes, while
//! callers pass human-readable references like `Sheet1!A1:B2`. The resolver
//! bridges the two: a pure parse of the sheet name and span, then a metadata
//! fetch to map the sheet title to its numeric id. No caching — every
//! resolution re-fetches metadata.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ToolError;
use crate::google::sheets::SheetsClient;

/// A rectangle of cells in the Sheets API GridRange shape: numeric sheet id,
/// zero-based row/column bounds, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: i64,
    pub end_row_index: i64,
    pub start_column_index: i64,
    pub end_column_index: i64,
}

impl GridRange {
    /// Render the span back in A1 notation, e.g. "A1:B2". The sheet name is
    /// omitted: the numeric id cannot be mapped back to a title without
    /// another metadata fetch.
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letters(self.start_column_index),
            self.start_row_index + 1,
            column_letters(self.end_column_index - 1),
            self.end_row_index
        )
    }
}

/// Sheet name and half-open span parsed from a range reference, before the
/// title has been resolved to a numeric sheet id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    pub sheet_name: String,
    pub start_row_index: i64,
    pub end_row_index: i64,
    pub start_column_index: i64,
    pub end_column_index: i64,
}

impl ParsedRange {
    /// Attach a resolved sheet id to produce the final grid range.
    pub fn with_sheet_id(&self, sheet_id: i64) -> GridRange {
        GridRange {
            sheet_id,
            start_row_index: self.start_row_index,
            end_row_index: self.end_row_index,
            start_column_index: self.start_column_index,
            end_column_index: self.end_column_index,
        }
    }
}

/// Convert column letters to a zero-based index.
///
/// Letters are a bijective base-26 number ('A' = 1 at every place value, no
/// zero digit): "A" → 0, "Z" → 25, "AA" → 26. Callers guarantee uppercase
/// A–Z input; the span pattern in [`parse_range`] enforces it.
pub fn column_index(letters: &str) -> i64 {
    let mut acc = 0i64;
    for b in letters.bytes() {
        acc = acc * 26 + i64::from(b - b'A' + 1);
    }
    acc - 1
}

/// Convert a zero-based column index back to letters ("A", ..., "Z", "AA").
pub fn column_letters(index: i64) -> String {
    let mut n = index + 1;
    let mut reversed = Vec::new();
    while n > 0 {
        n -= 1;
        reversed.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    reversed.iter().rev().map(|b| *b as char).collect()
}

fn span_pattern() -> &'static Regex {
    static SPAN_RE: OnceLock<Regex> = OnceLock::new();
    SPAN_RE.get_or_init(|| Regex::new(r"^([A-Z]+)([0-9]+):([A-Z]+)([0-9]+)$").unwrap())
}

/// Parse a range reference into a sheet name and half-open span.
///
/// The reference splits on the first `!` into sheet name and span. Single
/// quotes around the sheet name (added by spreadsheet UIs for names with
/// spaces) are stripped. The span must name both corners as column letters
/// plus a 1-based row number; open-ended spans (`A:A`, `1:5`) and bare
/// single cells are rejected. End bounds come out exclusive: end column is
/// the decoded end letters + 1, end row is the human row number unchanged.
///
/// An end corner that precedes the start corner is passed through as-is;
/// the backend decides what an inverted rectangle means.
pub fn parse_range(range: &str) -> Result<ParsedRange, ToolError> {
    let (sheet_part, span_part) = range.split_once('!').ok_or_else(|| {
        ToolError::MalformedRange(
            "range must include a sheet name (e.g. 'Sheet1!A1:B2')".to_string(),
        )
    })?;

    let sheet_name = strip_quotes(sheet_part);

    let span = span_part.to_uppercase();
    let caps = span_pattern()
        .captures(&span)
        .ok_or_else(|| ToolError::MalformedRange("range must look like A1:B2".to_string()))?;

    let start_row: i64 = caps[2]
        .parse()
        .map_err(|_| ToolError::MalformedRange(format!("row number '{}' is out of range", &caps[2])))?;
    let end_row: i64 = caps[4]
        .parse()
        .map_err(|_| ToolError::MalformedRange(format!("row number '{}' is out of range", &caps[4])))?;

    Ok(ParsedRange {
        sheet_name,
        start_row_index: start_row - 1,
        end_row_index: end_row,
        start_column_index: column_index(&caps[1]),
        end_column_index: column_index(&caps[3]) + 1,
    })
}

/// Resolve a range reference against a spreadsheet: parse locally, then map
/// the sheet title to its numeric id via a fresh metadata fetch.
pub async fn resolve_range(
    sheets: &SheetsClient,
    spreadsheet_id: &str,
    range: &str,
) -> Result<GridRange, ToolError> {
    let parsed = parse_range(range)?;
    let sheet_id = sheets
        .lookup_sheet_id(spreadsheet_id, &parsed.sheet_name)
        .await?;

    let grid = parsed.with_sheet_id(sheet_id);
    tracing::debug!("Resolved '{}' to sheet {} ({})", range, grid.sheet_id, grid.to_a1());
    Ok(grid)
}

fn strip_quotes(name: &str) -> String {
    name.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_index_anchors() {
        assert_eq!(column_index("A"), 0);
        assert_eq!(column_index("Z"), 25);
        assert_eq!(column_index("AA"), 26);
        assert_eq!(column_index("AZ"), 51);
        assert_eq!(column_index("BA"), 52);
    }

    #[test]
    fn test_column_index_strictly_increasing() {
        // Every column name of length 1-3, in spreadsheet order.
        let mut prev = -1;
        for len in 1..=3usize {
            let mut digits = vec![0usize; len];
            loop {
                let letters: String = digits.iter().map(|d| (b'A' + *d as u8) as char).collect();
                let index = column_index(&letters);
                assert!(index > prev, "{} did not increase", letters);
                prev = index;

                let mut pos = len;
                loop {
                    if pos == 0 {
                        break;
                    }
                    pos -= 1;
                    digits[pos] += 1;
                    if digits[pos] < 26 {
                        break;
                    }
                    digits[pos] = 0;
                }
                if digits.iter().all(|d| *d == 0) {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_column_letters_round_trip() {
        for index in [0, 25, 26, 51, 52, 701, 702, 18277] {
            assert_eq!(column_index(&column_letters(index)), index);
        }
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_parse_range_basic() {
        let parsed = parse_range("Sheet1!A1:B2").unwrap();
        assert_eq!(
            parsed,
            ParsedRange {
                sheet_name: "Sheet1".to_string(),
                start_row_index: 0,
                end_row_index: 2,
                start_column_index: 0,
                end_column_index: 2,
            }
        );
    }

    #[test]
    fn test_parse_range_quoted_sheet_name_single_cell() {
        let parsed = parse_range("'My Sheet'!C3:C3").unwrap();
        assert_eq!(parsed.sheet_name, "My Sheet");
        assert_eq!(parsed.start_row_index, 2);
        assert_eq!(parsed.end_row_index, 3);
        assert_eq!(parsed.start_column_index, 2);
        assert_eq!(parsed.end_column_index, 3);
    }

    #[test]
    fn test_parse_range_multi_letter_columns() {
        let parsed = parse_range("Data!AA1:AB2").unwrap();
        assert_eq!(parsed.start_column_index, 26);
        assert_eq!(parsed.end_column_index, 28);
    }

    #[test]
    fn test_parse_range_lowercase_span_is_uppercased() {
        let parsed = parse_range("Sheet1!a1:b2").unwrap();
        assert_eq!(parsed.start_column_index, 0);
        assert_eq!(parsed.end_column_index, 2);
    }

    #[test]
    fn test_parse_range_missing_sheet_name() {
        let err = parse_range("A1:B2").unwrap_err();
        assert_eq!(err.kind(), "malformed_range");
        assert!(err.to_string().contains("sheet name"));
    }

    #[test]
    fn test_parse_range_rejects_open_ended_spans() {
        assert_eq!(parse_range("Sheet1!A:A").unwrap_err().kind(), "malformed_range");
        assert_eq!(parse_range("Sheet1!1:5").unwrap_err().kind(), "malformed_range");
        assert_eq!(parse_range("Sheet1!A1").unwrap_err().kind(), "malformed_range");
    }

    #[test]
    fn test_parse_range_inverted_corners_pass_through() {
        // End before start is not reordered or rejected.
        let parsed = parse_range("Sheet1!B2:A1").unwrap();
        assert_eq!(parsed.start_row_index, 1);
        assert_eq!(parsed.end_row_index, 1);
        assert_eq!(parsed.start_column_index, 1);
        assert_eq!(parsed.end_column_index, 1);
    }

    #[test]
    fn test_to_a1_round_trip() {
        for span in ["A1:B2", "C3:C3", "AA1:AB2"] {
            let parsed = parse_range(&format!("Sheet1!{}", span)).unwrap();
            assert_eq!(parsed.with_sheet_id(0).to_a1(), span);
        }
    }

    #[test]
    fn test_resolution_against_sheet_metadata() {
        use crate::google::sheets::{find_sheet_id, SheetProperties};

        let metadata = vec![SheetProperties {
            sheet_id: 0,
            title: "Sheet1".to_string(),
        }];

        let parsed = parse_range("Sheet1!A1:B2").unwrap();
        let sheet_id = find_sheet_id(&metadata, &parsed.sheet_name).unwrap();
        assert_eq!(
            parsed.with_sheet_id(sheet_id),
            GridRange {
                sheet_id: 0,
                start_row_index: 0,
                end_row_index: 2,
                start_column_index: 0,
                end_column_index: 2,
            }
        );
    }

    #[test]
    fn test_grid_range_serializes_in_api_shape() {
        let grid = ParsedRange {
            sheet_name: "Sheet1".to_string(),
            start_row_index: 0,
            end_row_index: 2,
            start_column_index: 0,
            end_column_index: 2,
        }
        .with_sheet_id(7);

        let value = serde_json::to_value(grid).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sheetId": 7,
                "startRowIndex": 0,
                "endRowIndex": 2,
                "startColumnIndex": 0,
                "endColumnIndex": 2,
            })
        );
    }
}
