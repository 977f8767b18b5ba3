//! Delimited plain-text renderer.

use crate::model::{SheetTable, Workbook};

/// Options for text rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Separator placed between columns
    pub delimiter: String,

    /// Emit a `[name]` line before each sheet
    pub sheet_headers: bool,

    /// Omit rows without any cell
    pub skip_empty_rows: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            delimiter: "\t".to_string(),
            sheet_headers: true,
            skip_empty_rows: true,
        }
    }
}

impl TextOptions {
    /// Create new text options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set whether sheet header lines are emitted.
    pub fn with_sheet_headers(mut self, enabled: bool) -> Self {
        self.sheet_headers = enabled;
        self
    }

    /// Set whether rows without cells are omitted.
    pub fn with_skip_empty_rows(mut self, enabled: bool) -> Self {
        self.skip_empty_rows = enabled;
        self
    }
}

/// Render every sheet as a delimited grid.
///
/// Each sheet spans columns `0..=max_col`; newlines inside cell text become
/// spaces so one output line is one row. Sheets are separated by a blank
/// line.
pub fn to_text(book: &Workbook, options: &TextOptions) -> String {
    let mut blocks = Vec::with_capacity(book.len());

    for (name, table) in book.iter() {
        let mut lines = Vec::new();
        if options.sheet_headers {
            lines.push(format!("[{}]", name));
        }
        render_table(table, options, &mut lines);
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

fn render_table(table: &SheetTable, options: &TextOptions, lines: &mut Vec<String>) {
    let Some(max_col) = table.max_col() else {
        return;
    };
    let blank = options.delimiter.repeat(max_col);

    // rows are visited in order, so only populated rows cost anything
    let mut next_row = 0;
    let mut cells = table.iter().peekable();
    while let Some(&((row, _), _)) = cells.peek() {
        if !options.skip_empty_rows {
            lines.extend((next_row..row).map(|_| blank.clone()));
        }

        let mut fields = vec![""; max_col + 1];
        while let Some(((_, col), text)) = cells.next_if(|((r, _), _)| *r == row) {
            fields[col] = text;
        }

        let line = fields
            .iter()
            .map(|text| text.replace(['\r', '\n'], " "))
            .collect::<Vec<_>>()
            .join(options.delimiter.as_str());
        lines.push(line);
        next_row = row + 1;
    }
}
