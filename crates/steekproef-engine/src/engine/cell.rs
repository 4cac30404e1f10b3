//! Cell values as they travel through the sampler.

use std::fmt;

/// A single cell value. Workbook cells are reduced to these shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Date and/or time as a serial day number (1900 date system).
    DateTime(f64),
    #[default]
    Empty,
}

/// Row-major cell storage for one sheet. Rows may be ragged; missing trailing
/// cells read as [`CellValue::Empty`].
pub type Grid = Vec<Vec<CellValue>>;

impl CellValue {
    /// Build a text cell, normalising `""` to [`CellValue::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::DateTime(serial) => write!(f, "{}", format_number(*serial)),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Format a number for display: integers without decimals, everything else
/// in its shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
