//! Sampling engine API.
//!
//! - [`CellValue`], [`Grid`] - raw cell storage
//! - [`Sheet`], [`Row`] - header + rows view of one sheet, with output limits
//! - [`Workbook`], [`RawSheet`] - decoded input
//! - [`resolve_seed`] - stored-or-minted seed for a run
//! - [`SampleRng`], [`shuffle`] - seeded row shuffling
//! - [`sample_workbook`] - per-sheet orchestration with diagnostics

mod cell;
mod orchestrator;
mod sampler;
mod seed;
mod sheet;
mod workbook;

pub use cell::{CellValue, Grid, format_number};
pub use orchestrator::{SampleOptions, SheetOutcome, sample_sheet, sample_workbook};
pub use sampler::{SampleRng, shuffle, shuffle_sheet};
pub use seed::{
    ControlSheet, ControlSheetError, DEFAULT_CONTROL_SHEET, DEFAULT_SEED_COLUMN, Seed, SeedError,
    SeedOrigin, SeedResolution, read_stored_seed, resolve_seed,
};
pub use sheet::{
    MAX_CELL_TEXT_CHARS, MAX_COLUMNS, MAX_ROWS, MAX_SHEET_NAME_CHARS, Row, Sheet, SheetError,
    check_sheet_name, column_letters,
};
pub use workbook::{
    RawSheet, SampledWorkbook, SheetContent, SheetDiagnostic, Workbook, same_sheet_name,
};
