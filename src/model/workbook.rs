//! Ordered sheet collections.

use super::sheet::{CleanTable, SheetTable};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Sheets keyed by identifier, in discovery order.
///
/// Inserting an identifier that is already present replaces its value but
/// keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheets<T> {
    entries: Vec<(String, T)>,
}

/// Extraction result: sheet identifier to coordinate-keyed table.
pub type Workbook = Sheets<SheetTable>;

/// Extraction result with `"<row>,<col>"` keys.
pub type CleanWorkbook = Sheets<CleanTable>;

impl<T> Default for Sheets<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Sheets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sheet, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sheet identifiers in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(n, value)| (n.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Workbook {
    /// The same sheets with string coordinate keys.
    pub fn to_clean(&self) -> CleanWorkbook {
        Sheets {
            entries: self
                .entries
                .iter()
                .map(|(name, table)| (name.clone(), table.to_clean()))
                .collect(),
        }
    }

    /// Total number of non-blank cells across all sheets.
    pub fn cell_count(&self) -> usize {
        self.entries.iter().map(|(_, table)| table.len()).sum()
    }
}

impl<T> IntoIterator for Sheets<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for Sheets<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
