//! Workbook containers on both sides of a sampling run.

use super::cell::Grid;
use super::seed::SeedResolution;
use super::sheet::{Sheet, SheetError};
use std::fmt;

/// Contents of one decoded sheet, or why the decoder could not read it.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetContent {
    Cells(Grid),
    Unreadable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub content: SheetContent,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        RawSheet {
            name: name.into(),
            content: SheetContent::Cells(grid),
        }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RawSheet {
            name: name.into(),
            content: SheetContent::Unreadable(reason.into()),
        }
    }

    /// Interpret the raw cells as header + rows.
    pub fn to_sheet(&self) -> Result<Sheet, SheetError> {
        match &self.content {
            SheetContent::Cells(grid) => Sheet::from_grid(self.name.clone(), grid),
            SheetContent::Unreadable(reason) => Err(SheetError::Unreadable(reason.clone())),
        }
    }
}

/// Sheet names compare case-insensitively inside a workbook.
pub fn same_sheet_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Decoded input: sheets in container order. Names are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<RawSheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<RawSheet>) -> Self {
        Workbook { sheets }
    }

    /// First sheet called `name`, ignoring case.
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| same_sheet_name(&s.name, name))
    }

    pub fn sheet_position(&self, name: &str) -> Option<usize> {
        self.sheets
            .iter()
            .position(|s| same_sheet_name(&s.name, name))
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}

/// A sheet left out of the output, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetDiagnostic {
    pub sheet: String,
    pub reason: SheetError,
}

impl fmt::Display for SheetDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sheet skipped: {}: {}", self.sheet, self.reason)
    }
}

/// Result of sampling a workbook: output sheets (control sheet included),
/// the seed that drove the run, and the per-sheet side channel.
#[derive(Clone, Debug)]
pub struct SampledWorkbook {
    pub sheets: Vec<Sheet>,
    pub seed: SeedResolution,
    pub diagnostics: Vec<SheetDiagnostic>,
}

impl SampledWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| same_sheet_name(&s.name, name))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
