//! Sparse per-sheet cell storage.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A `(row, column)` coordinate, both 0-based.
pub type CellRef = (usize, usize);

/// Text content of one sheet, keyed by coordinate.
///
/// Blank cells are never stored. Iteration is row-major, which is also the
/// order in which the extractor discovers cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    cells: BTreeMap<CellRef, String>,
}

impl SheetTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store text at a coordinate, returning the previous value.
    pub fn insert(&mut self, row: usize, col: usize, text: impl Into<String>) -> Option<String> {
        self.cells.insert((row, col), text.into())
    }

    /// Text at a coordinate.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    /// Mutable text at a coordinate.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut String> {
        self.cells.get_mut(&(row, col))
    }

    /// Remove a cell, returning its text.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<String> {
        self.cells.remove(&(row, col))
    }

    /// Number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &str)> {
        self.cells.iter().map(|(key, text)| (*key, text.as_str()))
    }

    /// Coordinates of all stored cells, row-major.
    pub fn keys(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.cells.keys().copied()
    }

    /// Highest row index holding a cell.
    pub fn max_row(&self) -> Option<usize> {
        self.cells.keys().map(|(row, _)| *row).max()
    }

    /// Highest column index holding a cell.
    pub fn max_col(&self) -> Option<usize> {
        self.cells.keys().map(|(_, col)| *col).max()
    }

    /// The same cells keyed by `"<row>,<col>"`.
    pub fn to_clean(&self) -> CleanTable {
        CleanTable {
            cells: self
                .cells
                .iter()
                .map(|((row, col), text)| (clean_key(*row, *col), text.clone()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SheetTable {
    type Item = (&'a CellRef, &'a String);
    type IntoIter = btree_map::Iter<'a, CellRef, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl FromIterator<(CellRef, String)> for SheetTable {
    fn from_iter<I: IntoIterator<Item = (CellRef, String)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Render a coordinate as a string key.
pub fn clean_key(row: usize, col: usize) -> String {
    format!("{},{}", row, col)
}

/// String-keyed view of a [`SheetTable`], for formats without tuple keys.
///
/// Keeps the row-major order of the source table, so `"10,0"` follows
/// `"9,3"` rather than sorting as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanTable {
    cells: Vec<(String, String)>,
}

impl CleanTable {
    /// Text stored under a `"<row>,<col>"` key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate `(key, text)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in row-major order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for CleanTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, text) in &self.cells {
            map.serialize_entry(key, text)?;
        }
        map.end()
    }
}
