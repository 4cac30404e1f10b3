//! Sampling jobs: bytes in, bytes out, diagnostics on the side.

mod io;
mod state;

pub use io::{DEFAULT_OUTPUT_PREFIX, default_output_path, process, process_with, sample_file};
pub use state::SampleJob;
