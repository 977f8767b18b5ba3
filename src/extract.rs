//! Sheet and cell extraction from an ODS `content.xml` document.
//!
//! Sheets are `table` elements anywhere in the document. Within a sheet,
//! every `table-row` in the subtree is a row, and every `table-cell` (or
//! `covered-table-cell`) in a row's subtree is a cell. Cell text is the
//! leading text of each text-namespace descendant, joined with `\n`.
//!
//! Repeat counts only move the row/column counters, except when
//! [`ExtractOptions::duplicate_text_on_repeat`] asks for the text of a
//! non-blank cell to be copied into the columns it spans.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use crate::model::{SheetTable, Workbook};
use crate::tree::{self, Element};
use tracing::{debug, trace};

const SHEET_TAG: &str = "table";
const ROW_TAG: &str = "table-row";
const CELL_TAG: &str = "table-cell";
const NAME_ATTR: &str = "name";
const COLUMNS_REPEATED_ATTR: &str = "number-columns-repeated";
const ROWS_REPEATED_ATTR: &str = "number-rows-repeated";

/// Options controlling extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Copy the text of a non-blank cell into every column covered by its
    /// `number-columns-repeated` count. When false (the default), repeated
    /// columns are left empty and only the first one holds the text.
    pub duplicate_text_on_repeat: bool,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether repeated columns receive copies of the cell text.
    pub fn with_duplicate_text_on_repeat(mut self, duplicate: bool) -> Self {
        self.duplicate_text_on_repeat = duplicate;
        self
    }
}

/// Walks a parsed content document into a [`Workbook`].
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Parse raw `content.xml` bytes and extract every sheet.
    pub fn extract(&self, xml: &[u8]) -> Result<Workbook> {
        let text = decode_xml_bytes(xml)?;
        let root = tree::parse(&text)?;
        self.extract_document(&root)
    }

    /// Extract every sheet from an already parsed document.
    pub fn extract_document(&self, root: &Element) -> Result<Workbook> {
        let mut book = Workbook::new();

        let sheets = tree::find_all(root, |e, _, _| e.has_tag_suffix(SHEET_TAG));
        debug!(count = sheets.len(), "discovered sheets");

        for (index, sheet) in sheets.into_iter().enumerate() {
            let name = sheet_name(sheet, index + 1);
            let table = self.extract_sheet(sheet)?;
            trace!(sheet = %name, cells = table.len(), "extracted sheet");

            if book.insert(name.clone(), table).is_some() {
                debug!(sheet = %name, "sheet name seen twice, keeping the later sheet");
            }
        }

        Ok(book)
    }

    /// Walk the rows and cells of one sheet element.
    pub fn extract_sheet(&self, sheet: &Element) -> Result<SheetTable> {
        let mut table = SheetTable::new();
        let mut row = 0usize;

        for row_element in tree::find_all(sheet, |e, _, _| e.has_tag_suffix(ROW_TAG)) {
            let mut col = 0usize;

            for cell in tree::find_all(row_element, |e, _, _| e.has_tag_suffix(CELL_TAG)) {
                let text = cell_text(cell);
                let extra = repeat_count(cell, COLUMNS_REPEATED_ATTR)?
                    .map_or(0, |count| count.saturating_sub(1) as usize);

                if !text.is_empty() {
                    if self.options.duplicate_text_on_repeat {
                        for offset in 1..=extra {
                            table.insert(row, col + offset, text.clone());
                        }
                    }
                    table.insert(row, col, text);
                }
                col = col.saturating_add(extra).saturating_add(1);
            }

            // Repeated rows are assumed to carry no cells of their own.
            let repeated = repeat_count(row_element, ROWS_REPEATED_ATTR)?.unwrap_or(1);
            row = row.saturating_add(repeated.max(1) as usize);
        }

        Ok(table)
    }
}

/// Resolve a sheet's identifier: its `name` attribute, or `sheet<index>`
/// when that is missing or empty.
pub fn sheet_name(sheet: &Element, index: usize) -> String {
    match sheet.attribute(NAME_ATTR) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("sheet{}", index),
    }
}

/// Text of a cell: the leading text of every text element below it, joined
/// with newlines.
pub fn cell_text(cell: &Element) -> String {
    let parts: Vec<&str> = tree::find_all(cell, |e, _, _| e.is_text_element())
        .into_iter()
        .map(Element::text)
        .collect();
    parts.join("\n")
}

fn repeat_count(element: &Element, attribute: &str) -> Result<Option<u32>> {
    element
        .attribute(attribute)
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|source| Error::InvalidRepeatCount {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                    source,
                })
        })
        .transpose()
}

/// Extract every sheet from raw `content.xml` bytes with default options.
pub fn extract_sheets(xml: &[u8]) -> Result<Workbook> {
    Extractor::default().extract(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(tables: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content
    xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
    xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
    xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body><office:spreadsheet>{}</office:spreadsheet></office:body>
</office:document-content>"#,
            tables
        )
    }

    fn extract(tables: &str) -> Workbook {
        extract_sheets(document(tables).as_bytes()).unwrap()
    }

    fn extract_duplicating(tables: &str) -> Workbook {
        Extractor::new(ExtractOptions::new().with_duplicate_text_on_repeat(true))
            .extract(document(tables).as_bytes())
            .unwrap()
    }

    #[test]
    fn test_named_and_synthetic_sheets() {
        let book = extract(
            r#"<table:table table:name="A"><table:table-row>
                 <table:table-cell><text:p>a</text:p></table:table-cell>
               </table:table-row></table:table>
               <table:table><table:table-row>
                 <table:table-cell><text:p>b</text:p></table:table-cell>
               </table:table-row></table:table>
               <table:table table:name=""/>"#,
        );

        let names: Vec<&str> = book.names().collect();
        assert_eq!(names, vec!["A", "sheet2", "sheet3"]);
        assert_eq!(book.get("sheet2").unwrap().get(0, 0), Some("b"));
        assert!(book.get("sheet3").unwrap().is_empty());
    }

    #[test]
    fn test_first_unnamed_sheet_is_sheet1() {
        let book = extract(r#"<table:table/><table:table table:name="A"/>"#);
        let names: Vec<&str> = book.names().collect();
        assert_eq!(names, vec!["sheet1", "A"]);
    }

    #[test]
    fn test_style_name_is_not_a_sheet_name() {
        let book = extract(r#"<table:table table:style-name="ta1"/>"#);
        let names: Vec<&str> = book.names().collect();
        assert_eq!(names, vec!["sheet1"]);
    }

    #[test]
    fn test_empty_second_row() {
        let book = extract(
            r#"<table:table table:name="S">
                 <table:table-row><table:table-cell><text:p>x</text:p></table:table-cell></table:table-row>
                 <table:table-row><table:table-cell/></table:table-row>
               </table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.get(0, 0), Some("x"));
    }

    #[test]
    fn test_blank_repeated_columns_are_skipped() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell><text:p>a</text:p></table:table-cell>
                 <table:table-cell table:number-columns-repeated="3"/>
                 <table:table-cell><text:p>b</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        let keys: Vec<_> = sheet.keys().collect();
        assert_eq!(keys, vec![(0, 0), (0, 4)]);
        assert_eq!(sheet.get(0, 4), Some("b"));
    }

    #[test]
    fn test_filled_repeated_columns_default() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell table:number-columns-repeated="3"><text:p>r</text:p></table:table-cell>
                 <table:table-cell><text:p>next</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        let keys: Vec<_> = sheet.keys().collect();
        assert_eq!(keys, vec![(0, 0), (0, 3)]);
        assert_eq!(sheet.get(0, 3), Some("next"));
    }

    #[test]
    fn test_filled_repeated_columns_duplicated() {
        let book = extract_duplicating(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell table:number-columns-repeated="3"><text:p>r</text:p></table:table-cell>
                 <table:table-cell><text:p>next</text:p></table:table-cell>
                 <table:table-cell table:number-columns-repeated="2"/>
                 <table:table-cell><text:p>end</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        let cells: Vec<_> = sheet.iter().collect();
        assert_eq!(
            cells,
            vec![
                ((0, 0), "r"),
                ((0, 1), "r"),
                ((0, 2), "r"),
                ((0, 3), "next"),
                ((0, 6), "end"),
            ]
        );
    }

    #[test]
    fn test_repeated_rows_advance_counter() {
        let book = extract(
            r#"<table:table table:name="S">
                 <table:table-row><table:table-cell><text:p>top</text:p></table:table-cell></table:table-row>
                 <table:table-row table:number-rows-repeated="4"><table:table-cell/></table:table-row>
                 <table:table-row><table:table-cell/><table:table-cell><text:p>low</text:p></table:table-cell></table:table-row>
               </table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        assert_eq!(sheet.get(0, 0), Some("top"));
        assert_eq!(sheet.get(5, 1), Some("low"));
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_multiline_cell_text() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell><text:p>line1</text:p><text:p>line2</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        assert_eq!(book.get("S").unwrap().get(0, 0), Some("line1\nline2"));
    }

    #[test]
    fn test_nested_spans_join_as_separate_segments() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell><text:p>Total: <text:span>42</text:span></text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        assert_eq!(book.get("S").unwrap().get(0, 0), Some("Total: \n42"));
    }

    #[test]
    fn test_empty_paragraphs_are_not_blank() {
        // two empty paragraphs join to a lone newline
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell><text:p/><text:p/></table:table-cell>
               </table:table-row></table:table>"#,
        );
        assert_eq!(book.get("S").unwrap().get(0, 0), Some("\n"));
    }

    #[test]
    fn test_covered_cells_take_a_column() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell table:number-columns-spanned="2"><text:p>merged</text:p></table:table-cell>
                 <table:covered-table-cell/>
                 <table:table-cell><text:p>after</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        assert_eq!(sheet.get(0, 0), Some("merged"));
        assert_eq!(sheet.get(0, 2), Some("after"));
    }

    #[test]
    fn test_rows_inside_wrappers_are_found() {
        let book = extract(
            r#"<table:table table:name="S">
                 <table:table-header-rows>
                   <table:table-row><table:table-cell><text:p>head</text:p></table:table-cell></table:table-row>
                 </table:table-header-rows>
                 <table:table-row-group>
                   <table:table-row><table:table-cell><text:p>body</text:p></table:table-cell></table:table-row>
                 </table:table-row-group>
               </table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        assert_eq!(sheet.get(0, 0), Some("head"));
        assert_eq!(sheet.get(1, 0), Some("body"));
    }

    #[test]
    fn test_duplicate_sheet_names_overwrite() {
        let book = extract(
            r#"<table:table table:name="Dup"><table:table-row>
                 <table:table-cell><text:p>first</text:p></table:table-cell>
               </table:table-row></table:table>
               <table:table table:name="Dup"><table:table-row>
                 <table:table-cell/><table:table-cell><text:p>second</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        assert_eq!(book.len(), 1);
        let sheet = book.get("Dup").unwrap();
        assert_eq!(sheet.get(0, 0), None);
        assert_eq!(sheet.get(0, 1), Some("second"));
    }

    #[test]
    fn test_zero_repeat_counts_advance_once() {
        let book = extract(
            r#"<table:table table:name="S">
                 <table:table-row table:number-rows-repeated="0">
                   <table:table-cell table:number-columns-repeated="0"/>
                   <table:table-cell><text:p>a</text:p></table:table-cell>
                 </table:table-row>
                 <table:table-row><table:table-cell><text:p>b</text:p></table:table-cell></table:table-row>
               </table:table>"#,
        );
        let sheet = book.get("S").unwrap();
        assert_eq!(sheet.get(0, 1), Some("a"));
        assert_eq!(sheet.get(1, 0), Some("b"));
    }

    #[test]
    fn test_invalid_repeat_count() {
        let xml = document(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell table:number-columns-repeated="many"/>
               </table:table-row></table:table>"#,
        );
        match extract_sheets(xml.as_bytes()) {
            Err(Error::InvalidRepeatCount {
                attribute, value, ..
            }) => {
                assert_eq!(attribute, "number-columns-repeated");
                assert_eq!(value, "many");
            }
            other => panic!("expected InvalidRepeatCount, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_count_whitespace_is_trimmed() {
        let book = extract(
            r#"<table:table table:name="S"><table:table-row>
                 <table:table-cell table:number-columns-repeated=" 2 "/>
                 <table:table-cell><text:p>c</text:p></table:table-cell>
               </table:table-row></table:table>"#,
        );
        assert_eq!(book.get("S").unwrap().get(0, 2), Some("c"));
    }

    #[test]
    fn test_malformed_xml() {
        let result = extract_sheets(b"<office:document-content><table:table>");
        assert!(matches!(result, Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_invalid_utf8_content_fails() {
        let xml = b"<doc><table name=\"S\"><table-row><table-cell>\
                    <text>caf\xE9</text></table-cell></table-row></table></doc>";
        assert!(matches!(extract_sheets(xml), Err(Error::XmlParse(_))));
    }

    #[test]
    fn test_declared_latin1_content() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
                    <doc><table name=\"S\"><table-row><table-cell>\
                    <text>caf\xE9</text></table-cell></table-row></table></doc>";
        let book = extract_sheets(xml).unwrap();
        assert_eq!(book.get("S").unwrap().get(0, 0), Some("caf\u{e9}"));
    }

    #[test]
    fn test_unnamespaced_text_elements() {
        let xml = br#"<doc><table name="Plain"><table-row><table-cell>
                        <text>line1</text><text>line2</text>
                      </table-cell></table-row></table></doc>"#;
        let book = extract_sheets(xml).unwrap();
        assert_eq!(book.get("Plain").unwrap().get(0, 0), Some("line1\nline2"));
    }
}
