//! Cached spreadsheet reader.

use crate::container::OdsContainer;
use crate::error::Result;
use crate::extract::{ExtractOptions, Extractor};
use crate::model::{CleanWorkbook, Workbook};
use once_cell::sync::OnceCell;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads the sheets of one ODS package.
///
/// The package is parsed on the first call to [`sheets`](Self::sheets) or
/// [`clean_sheets`](Self::clean_sheets) and the result is kept for the
/// lifetime of the reader. Every call hands out its own copy, so changes to
/// a returned workbook never reach the cache. A failed read is not cached.
///
/// # Example
///
/// ```no_run
/// use odsheets::OdsReader;
///
/// let reader = OdsReader::open("budget.ods");
/// for (name, table) in reader.sheets()?.iter() {
///     println!("{}: {} cells", name, table.len());
/// }
/// # Ok::<(), odsheets::Error>(())
/// ```
#[derive(Debug)]
pub struct OdsReader {
    container: OdsContainer,
    options: ExtractOptions,
    cache: OnceCell<Workbook>,
}

impl OdsReader {
    /// Create a reader for a package on disk. Nothing is read until the
    /// sheets are requested.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::from_container(OdsContainer::open(path))
    }

    /// Create a reader over an in-memory package.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::from_container(OdsContainer::from_bytes(data))
    }

    /// Create a reader by draining `reader` into memory.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from_container(OdsContainer::from_reader(reader)?))
    }

    /// Create a reader around an existing container.
    pub fn from_container(container: OdsContainer) -> Self {
        Self {
            container,
            options: ExtractOptions::default(),
            cache: OnceCell::new(),
        }
    }

    /// Replace the extraction options. Drops any cached result.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self.cache = OnceCell::new();
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The target identifier the reader was created with.
    pub fn target(&self) -> &str {
        self.container.target()
    }

    pub fn container(&self) -> &OdsContainer {
        &self.container
    }

    /// Whether the sheets have already been extracted.
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Sheet identifier to `(row, col)`-keyed text.
    pub fn sheets(&self) -> Result<Workbook> {
        let book = self.cache.get_or_try_init(|| {
            debug!(target = %self.container.target(), "extracting sheets");
            let xml = self.container.read_content()?;
            Extractor::new(self.options).extract(&xml)
        })?;
        Ok(book.clone())
    }

    /// The same data as [`sheets`](Self::sheets) with `"<row>,<col>"` keys.
    pub fn clean_sheets(&self) -> Result<CleanWorkbook> {
        Ok(self.sheets()?.to_clean())
    }
}
