//! Extraction result model.
//!
//! A [`Workbook`] maps sheet identifiers to sparse [`SheetTable`]s keyed by
//! `(row, column)`. [`CleanWorkbook`] is the same data keyed by
//! `"<row>,<col>"` strings, which is what the JSON renderer emits.

mod sheet;
mod workbook;

pub use sheet::*;
pub use workbook::*;
