//! Error types for the Steekproef command line

use std::path::PathBuf;
use steekproef_engine::engine::SeedError;
use thiserror::Error;

/// Errors in how the command line was used
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{option} requires {what}")]
    MissingValue { option: String, what: &'static str },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("No input workbook given")]
    MissingInput,

    #[error("Invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),

    #[error("Refusing to overwrite the input workbook {0}")]
    OutputIsInput(PathBuf),
}
