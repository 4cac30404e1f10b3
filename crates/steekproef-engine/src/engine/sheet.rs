//! Header-plus-rows view of a single sheet.
//!
//! A [`Sheet`] is what the sampler works on: the first row of the source grid
//! becomes the column set, every following row a [`Row`] aligned with it.

use super::cell::{CellValue, Grid, format_number};
use std::collections::HashSet;
use thiserror::Error;

/// Longest sheet name an xlsx container accepts.
pub const MAX_SHEET_NAME_CHARS: usize = 31;
/// Longest text an xlsx cell holds.
pub const MAX_CELL_TEXT_CHARS: usize = 32_767;
/// Rows per xlsx sheet, header included.
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;

/// Reasons a sheet cannot be turned into header + rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("sheet could not be read: {0}")]
    Unreadable(String),

    #[error("sheet has no header row")]
    MissingHeader,

    #[error("column {column} has data but no header")]
    BlankHeader { column: String },

    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    #[error("sheet name {reason}")]
    InvalidName { reason: &'static str },

    #[error("another sheet is already named '{0}'")]
    DuplicateSheetName(String),

    #[error("{rows} rows by {columns} columns does not fit in an xlsx sheet")]
    TooLarge { rows: usize, columns: usize },

    #[error("cell {cell} holds more than {max} characters", max = MAX_CELL_TEXT_CHARS)]
    TextTooLong { cell: String },

    #[error("cell {cell} holds a number that is not finite")]
    NotFinite { cell: String },
}

/// One data row; values are positionally aligned with [`Sheet::columns`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub values: Vec<CellValue>,
}

impl Row {
    pub fn new(values: Vec<CellValue>) -> Self {
        Row { values }
    }

    /// True when no column holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(values: Vec<CellValue>) -> Self {
        Row::new(values)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Sheet {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Split a raw grid into header and data rows.
    ///
    /// Columns with an empty header cell are dropped when they carry no data;
    /// if any data row has a value under an empty header the sheet is rejected.
    pub fn from_grid(name: impl Into<String>, grid: &Grid) -> Result<Sheet, SheetError> {
        let Some((header, body)) = grid.split_first() else {
            return Err(SheetError::MissingHeader);
        };

        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut kept: Vec<usize> = Vec::with_capacity(width);
        let mut columns: Vec<String> = Vec::with_capacity(width);
        let mut seen: HashSet<String> = HashSet::new();

        for col in 0..width {
            let title = match header.get(col).unwrap_or(&CellValue::Empty) {
                CellValue::Empty => None,
                CellValue::Text(s) => Some(s.clone()),
                CellValue::Number(n) | CellValue::DateTime(n) => Some(format_number(*n)),
            };
            match title {
                Some(title) => {
                    if !seen.insert(title.clone()) {
                        return Err(SheetError::DuplicateColumn { name: title });
                    }
                    kept.push(col);
                    columns.push(title);
                }
                None => {
                    let has_data = body
                        .iter()
                        .any(|row| row.get(col).is_some_and(|v| !v.is_empty()));
                    if has_data {
                        return Err(SheetError::BlankHeader {
                            column: column_letters(col),
                        });
                    }
                }
            }
        }

        if columns.is_empty() {
            return Err(SheetError::MissingHeader);
        }

        let rows = body
            .iter()
            .map(|raw| {
                let values = kept
                    .iter()
                    .map(|&col| raw.get(col).cloned().unwrap_or_default())
                    .collect();
                Row::new(values)
            })
            .collect();

        Ok(Sheet {
            name: name.into(),
            columns,
            rows,
        })
    }

    /// Header row followed by the data rows.
    pub fn to_grid(&self) -> Grid {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(
            self.columns
                .iter()
                .map(|c| CellValue::Text(c.clone()))
                .collect(),
        );
        grid.extend(self.rows.iter().map(|row| row.values.clone()));
        grid
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` in data row `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.values.get(col)
    }

    /// Check the sheet fits the output container: name rules, dimensions,
    /// text length and finite numbers. Cells are reported A1-style.
    pub fn check_limits(&self) -> Result<(), SheetError> {
        check_sheet_name(&self.name).map_err(|reason| SheetError::InvalidName { reason })?;

        if self.rows.len() + 1 > MAX_ROWS || self.columns.len() > MAX_COLUMNS {
            return Err(SheetError::TooLarge {
                rows: self.rows.len() + 1,
                columns: self.columns.len(),
            });
        }

        for (col, title) in self.columns.iter().enumerate() {
            if title.chars().count() > MAX_CELL_TEXT_CHARS {
                return Err(SheetError::TextTooLong {
                    cell: cell_label(0, col),
                });
            }
        }

        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col, value) in row.values.iter().enumerate() {
                match value {
                    CellValue::Text(s) if s.chars().count() > MAX_CELL_TEXT_CHARS => {
                        return Err(SheetError::TextTooLong {
                            cell: cell_label(row_idx + 1, col),
                        });
                    }
                    CellValue::Number(n) | CellValue::DateTime(n) if !n.is_finite() => {
                        return Err(SheetError::NotFinite {
                            cell: cell_label(row_idx + 1, col),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// Workbook sheet names: 1-31 characters, none of `[]:*?/\`, no leading or
/// trailing apostrophe.
pub fn check_sheet_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("must not be empty");
    }
    if name.chars().count() > MAX_SHEET_NAME_CHARS {
        return Err("longer than 31 characters");
    }
    if name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
        return Err("contains one of []:*?/\\");
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err("starts or ends with an apostrophe");
    }
    Ok(())
}

/// `A1`-style label for a zero-based grid position.
fn cell_label(row: usize, col: usize) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

/// Spreadsheet-style column letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col as u128 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        result.insert(0, (b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    result
}
