//! JSON renderer implementation.

use crate::error::Result;
use crate::model::CleanWorkbook;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert the string-keyed sheets to JSON.
///
/// The output is an object of sheets, each an object of `"row,col"` keys,
/// in discovery order.
pub fn to_json(sheets: &CleanWorkbook, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(sheets)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(sheets)?,
    };
    Ok(json)
}

/// Convert the string-keyed sheets to pretty-printed JSON.
pub fn to_json_default(sheets: &CleanWorkbook) -> Result<String> {
    to_json(sheets, JsonFormat::Pretty)
}
