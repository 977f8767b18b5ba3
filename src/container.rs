//! ZIP container access for OpenDocument packages.

use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the package member holding the document body.
pub const CONTENT_MEMBER: &str = "content.xml";

/// Name of the package member holding the media type.
pub const MIMETYPE_MEMBER: &str = "mimetype";

/// Target label used for packages supplied as bytes.
const MEMORY_TARGET: &str = "<memory>";

trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

#[derive(Clone)]
enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Read-only handle to an ODS package.
///
/// The archive is opened for each call and closed before the call returns,
/// so a container holds no open file between reads.
#[derive(Clone)]
pub struct OdsContainer {
    source: Source,
    target: String,
}

/// The XML declaration at the start of `content`, including the closing `?>`.
fn xml_declaration(content: &str) -> Option<&str> {
    if !content.starts_with("<?xml") {
        return None;
    }
    content.find("?>").map(|end| &content[..end + 2])
}

/// Byte range of the `encoding` pseudo-attribute value inside a declaration.
fn encoding_range(decl: &str) -> Option<Range<usize>> {
    let key_end = decl.find("encoding")? + "encoding".len();
    let rest = &decl[key_end..];
    let eq = rest.find('=')?;
    if !rest[..eq].trim().is_empty() {
        return None;
    }

    let value = &rest[eq + 1..];
    let padding = value.len() - value.trim_start().len();
    let quote = value[padding..]
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '\'')?;

    let start = key_end + eq + 1 + padding + 1;
    let len = decl[start..].find(quote)?;
    Some(start..start + len)
}

/// The encoding named by the XML declaration of an ASCII-compatible body.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|pair| pair == b"?>")?;
    let decl = std::str::from_utf8(&bytes[..end + 2]).ok()?;
    encoding_range(decl).map(|range| &decl[range])
}

/// Point the encoding declaration at UTF-8 once the content has been decoded.
fn fix_xml_encoding_declaration(content: &str) -> String {
    match xml_declaration(content).and_then(encoding_range) {
        Some(range) => format!("{}UTF-8{}", &content[..range.start], &content[range.end..]),
        None => content.to_string(),
    }
}

/// Decode XML bytes to a string.
///
/// Handles UTF-8 (with or without BOM), UTF-16 LE/BE, and ASCII-compatible
/// encodings named in the XML declaration such as `ISO-8859-1`. Bytes that
/// are not valid in the detected encoding fail with [`Error::XmlParse`];
/// nothing is replaced.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return decode_utf8(rest);
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(label) = declared_encoding(bytes) {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::XmlParse(format!("unsupported encoding: {}", label)))?;
        if encoding != UTF_8 && encoding != UTF_16LE && encoding != UTF_16BE {
            return decode_declared(bytes, encoding);
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        // ASCII markup in UTF-16 leaves a zero byte in every other position
        Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
            decode_utf16(bytes, u16::from_le_bytes)
        }
        Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
            decode_utf16(bytes, u16::from_be_bytes)
        }
        Err(e) => Err(Error::XmlParse(format!("content is not valid UTF-8: {}", e))),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::XmlParse(format!("content is not valid UTF-8: {}", e)))
}

fn decode_declared(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let content = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| Error::XmlParse(format!("content is not valid {}", encoding.name())))?;
    debug!(encoding = encoding.name(), "decoded declared encoding");
    Ok(fix_xml_encoding_declaration(&content))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("content is not valid UTF-16: {}", e)))
}

impl OdsContainer {
    /// Create a container for a package on disk.
    ///
    /// No I/O happens until the first read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use odsheets::container::OdsContainer;
    ///
    /// let container = OdsContainer::open("budget.ods");
    /// let xml = container.read_content()?;
    /// # Ok::<(), odsheets::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            target: path.display().to_string(),
            source: Source::Path(path.to_path_buf()),
        }
    }

    /// Create a container over an in-memory package.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            source: Source::Bytes(data),
            target: MEMORY_TARGET.to_string(),
        }
    }

    /// Create a container by draining a reader into memory.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    /// The identifier this container was created with.
    pub fn target(&self) -> &str {
        &self.target
    }

    fn archive(&self) -> Result<zip::ZipArchive<Box<dyn ReadSeek + '_>>> {
        let reader: Box<dyn ReadSeek + '_> = match &self.source {
            Source::Path(path) => Box::new(BufReader::new(File::open(path)?)),
            Source::Bytes(data) => Box::new(Cursor::new(data.as_slice())),
        };
        Ok(zip::ZipArchive::new(reader)?)
    }

    /// Read the raw bytes of `content.xml`.
    ///
    /// Fails with [`Error::InvalidSpreadsheet`] when the package has no such
    /// member. Corrupt archives surface as [`Error::ZipArchive`].
    pub fn read_content(&self) -> Result<Vec<u8>> {
        let mut archive = self.archive()?;

        if !archive.file_names().any(|name| name == CONTENT_MEMBER) {
            return Err(Error::InvalidSpreadsheet(self.target.clone()));
        }

        let mut file = archive.by_name(CONTENT_MEMBER)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;

        debug!(target = %self.target, bytes = data.len(), "read content.xml");
        Ok(data)
    }

    /// Read any member of the package.
    pub fn read_member(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive()?;
        let mut file = archive
            .by_name(name)
            .map_err(|_| Error::MissingComponent(name.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a member exists in the package.
    pub fn exists(&self, name: &str) -> Result<bool> {
        let archive = self.archive()?;
        let found = archive.file_names().any(|n| n == name);
        Ok(found)
    }

    /// List all members of the package.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let archive = self.archive()?;
        Ok(archive.file_names().map(String::from).collect())
    }

    /// The trimmed contents of the `mimetype` member, if present.
    pub fn mimetype(&self) -> Result<Option<String>> {
        let mut archive = self.archive()?;
        let mut file = match archive.by_name(MIMETYPE_MEMBER) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(Some(content.trim().to_string()))
    }
}

impl std::fmt::Debug for OdsContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdsContainer")
            .field("target", &self.target)
            .finish()
    }
}
