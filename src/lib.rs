//! # odsheets
//!
//! Simple tabular text extraction from OpenDocument Spreadsheet (ODS) files.
//!
//! An ODS file is a ZIP package whose `content.xml` describes sheets, rows
//! and cells. This library reads that document and returns, per sheet, a
//! sparse map from `(row, column)` to the cell's text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use odsheets::OdsReader;
//!
//! let reader = OdsReader::open("budget.ods");
//!
//! // Coordinate-keyed tables, one per sheet
//! let sheets = reader.sheets()?;
//! if let Some(table) = sheets.get("Summary") {
//!     println!("A1 = {:?}", table.get(0, 0));
//! }
//!
//! // String-keyed view, ready for JSON
//! let json = odsheets::render::to_json_default(&reader.clean_sheets()?)?;
//! println!("{}", json);
//! # Ok::<(), odsheets::Error>(())
//! ```
//!
//! ## Repeated columns
//!
//! ODS compresses runs of identical cells with `number-columns-repeated`.
//! By default only the first column of a run receives the text; set
//! [`ExtractOptions::duplicate_text_on_repeat`] to fill every column.
//!
//! ```no_run
//! use odsheets::{ExtractOptions, OdsReader};
//!
//! let reader = OdsReader::open("budget.ods")
//!     .with_options(ExtractOptions::new().with_duplicate_text_on_repeat(true));
//! let sheets = reader.sheets()?;
//! # Ok::<(), odsheets::Error>(())
//! ```

pub mod container;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod reader;
pub mod render;
pub mod tree;

// Re-exports
pub use container::OdsContainer;
pub use detect::{detect_kind_from_bytes, detect_kind_from_path, PackageKind};
pub use error::{Error, Result};
pub use extract::{extract_sheets, ExtractOptions, Extractor};
pub use model::{CellRef, CleanTable, CleanWorkbook, SheetTable, Sheets, Workbook};
pub use reader::OdsReader;

use std::path::Path;

/// Read every sheet of an ODS file.
///
/// # Example
///
/// ```no_run
/// let sheets = odsheets::sheets("budget.ods")?;
/// println!("Sheets: {}", sheets.len());
/// # Ok::<(), odsheets::Error>(())
/// ```
pub fn sheets(path: impl AsRef<Path>) -> Result<Workbook> {
    OdsReader::open(path).sheets()
}

/// Read every sheet of an ODS file with `"<row>,<col>"` keys.
pub fn clean_sheets(path: impl AsRef<Path>) -> Result<CleanWorkbook> {
    OdsReader::open(path).clean_sheets()
}

/// Read every sheet of an in-memory ODS package.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("budget.ods")?;
/// let sheets = odsheets::sheets_from_bytes(data)?;
/// # Ok::<(), odsheets::Error>(())
/// ```
pub fn sheets_from_bytes(data: Vec<u8>) -> Result<Workbook> {
    OdsReader::from_bytes(data).sheets()
}

/// Convert an ODS file to pretty-printed JSON.
///
/// # Example
///
/// ```no_run
/// let json = odsheets::to_json("budget.ods")?;
/// std::fs::write("budget.json", json)?;
/// # Ok::<(), odsheets::Error>(())
/// ```
pub fn to_json(path: impl AsRef<Path>) -> Result<String> {
    render::to_json_default(&clean_sheets(path)?)
}
