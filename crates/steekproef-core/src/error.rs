//! Error types for Steekproef core.

use thiserror::Error;

/// Job-level failures. Per-sheet problems are never reported here; they end
/// up in the job's diagnostics instead.
#[derive(Error, Debug)]
pub enum SteekproefError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read workbook: {0}")]
    Decode(#[from] calamine::Error),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Cannot write workbook: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, SteekproefError>;
