//! Error types for the odsheets library.

use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for odsheets operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a spreadsheet package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a ZIP-based OpenDocument package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The package has no `content.xml` member. Carries the target as supplied.
    #[error("Invalid spreadsheet file: {0}")]
    InvalidSpreadsheet(String),

    /// A requested package member is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// A repeat-count attribute whose value is not an unsigned integer.
    #[error("Invalid repeat count {value:?} in attribute {attribute}")]
    InvalidRepeatCount {
        attribute: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Error during JSON serialization.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}
