//! Package kind detection for OpenDocument files.
//!
//! Detection is advisory: extraction only requires `content.xml`, so a
//! package with a missing or foreign `mimetype` can still be read.

use crate::container::MIMETYPE_MEMBER;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const SPREADSHEET_MIME: &str = "application/vnd.oasis.opendocument.spreadsheet";
const SPREADSHEET_TEMPLATE_MIME: &str = "application/vnd.oasis.opendocument.spreadsheet-template";
const TEXT_MIME: &str = "application/vnd.oasis.opendocument.text";
const PRESENTATION_MIME: &str = "application/vnd.oasis.opendocument.presentation";
const DRAWING_MIME: &str = "application/vnd.oasis.opendocument.graphics";

/// Kind of OpenDocument package, as declared by its `mimetype` member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageKind {
    /// Spreadsheet (.ods)
    Spreadsheet,
    /// Spreadsheet template (.ots)
    SpreadsheetTemplate,
    /// Text document (.odt)
    Text,
    /// Presentation (.odp)
    Presentation,
    /// Drawing (.odg)
    Drawing,
    /// Some other declared media type.
    Other(String),
    /// The package has no `mimetype` member.
    Unlabelled,
}

impl PackageKind {
    /// Map a media type string to a package kind.
    pub fn from_mimetype(mimetype: &str) -> Self {
        match mimetype.trim() {
            SPREADSHEET_MIME => PackageKind::Spreadsheet,
            SPREADSHEET_TEMPLATE_MIME => PackageKind::SpreadsheetTemplate,
            TEXT_MIME => PackageKind::Text,
            PRESENTATION_MIME => PackageKind::Presentation,
            DRAWING_MIME => PackageKind::Drawing,
            other => PackageKind::Other(other.to_string()),
        }
    }

    /// Whether the package declares spreadsheet content.
    pub fn is_spreadsheet(&self) -> bool {
        matches!(
            self,
            PackageKind::Spreadsheet | PackageKind::SpreadsheetTemplate
        )
    }

    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &str {
        match self {
            PackageKind::Spreadsheet => "OpenDocument Spreadsheet",
            PackageKind::SpreadsheetTemplate => "OpenDocument Spreadsheet Template",
            PackageKind::Text => "OpenDocument Text",
            PackageKind::Presentation => "OpenDocument Presentation",
            PackageKind::Drawing => "OpenDocument Drawing",
            PackageKind::Other(mime) => mime,
            PackageKind::Unlabelled => "Unlabelled package",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the package kind of a file.
///
/// # Example
///
/// ```no_run
/// use odsheets::detect::detect_kind_from_path;
///
/// let kind = detect_kind_from_path("budget.ods")?;
/// println!("Detected: {}", kind);
/// # Ok::<(), odsheets::Error>(())
/// ```
pub fn detect_kind_from_path(path: impl AsRef<Path>) -> Result<PackageKind> {
    let file = File::open(path.as_ref())?;
    detect_kind_from_reader(BufReader::new(file))
}

/// Detect the package kind of an in-memory package.
pub fn detect_kind_from_bytes(data: &[u8]) -> Result<PackageKind> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_kind_from_reader(std::io::Cursor::new(data))
}

/// Detect the package kind from a reader.
pub fn detect_kind_from_reader<R: Read + Seek>(reader: R) -> Result<PackageKind> {
    let mut archive = match zip::ZipArchive::new(reader) {
        Ok(archive) => archive,
        Err(ZipError::InvalidArchive(_)) => return Err(Error::UnknownFormat),
        Err(e) => return Err(e.into()),
    };

    let mut file = match archive.by_name(MIMETYPE_MEMBER) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(PackageKind::Unlabelled),
        Err(e) => return Err(e.into()),
    };
    let mut mimetype = String::new();
    file.read_to_string(&mut mimetype)?;

    Ok(PackageKind::from_mimetype(&mimetype))
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}
