//! Output rendering for extracted sheets.
//!
//! # Example
//!
//! ```no_run
//! use odsheets::{render::*, OdsReader};
//!
//! let reader = OdsReader::open("budget.ods");
//!
//! // Render to JSON
//! let json = to_json(&reader.clean_sheets()?, JsonFormat::Pretty)?;
//!
//! // Render to tab-separated text
//! let text = to_text(&reader.sheets()?, &TextOptions::default());
//! # Ok::<(), odsheets::Error>(())
//! ```

mod json;
mod text;

pub use json::{to_json, to_json_default, JsonFormat};
pub use text::{to_text, TextOptions};
