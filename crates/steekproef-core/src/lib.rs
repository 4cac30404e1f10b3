//! steekproef-core - Workbook codec + sampling job API.

pub mod error;
pub mod job;
pub mod storage;

pub use error::{Result, SteekproefError};
pub use job::{
    DEFAULT_OUTPUT_PREFIX, SampleJob, default_output_path, process, process_with, sample_file,
};

pub use steekproef_engine::engine::{
    ControlSheet, SampleOptions, Seed, SeedOrigin, check_sheet_name,
};
