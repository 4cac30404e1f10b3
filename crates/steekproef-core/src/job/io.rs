use super::SampleJob;
use crate::error::{Result, SteekproefError};
use crate::storage::{decode_workbook, encode_workbook};
use std::path::{Path, PathBuf};
use steekproef_engine::engine::{SampleOptions, sample_workbook};
use tracing::info;

const MAX_INPUT_BYTES: u64 = 64 * 1_048_576; // 64 MiB

/// Prefix of the default output file name.
pub const DEFAULT_OUTPUT_PREFIX: &str = "steekproef_";

/// Shuffle every data sheet of a workbook with default options.
pub fn process(input: &[u8]) -> Result<Vec<u8>> {
    Ok(process_with(input, &SampleOptions::default())?.bytes)
}

/// Shuffle every data sheet of a workbook.
///
/// Only an unreadable container fails the job; sheets that cannot be sampled
/// or would not fit an xlsx sheet are reported in [`SampleJob::diagnostics`].
pub fn process_with(input: &[u8], options: &SampleOptions) -> Result<SampleJob> {
    let workbook = decode_workbook(input)?;
    let sampled = sample_workbook(&workbook, options);
    let bytes = encode_workbook(&sampled.sheets)?;

    info!(
        seed = sampled.seed.seed.value(),
        origin = %sampled.seed.origin,
        sheets = sampled.sheets.len(),
        skipped = sampled.diagnostics.len(),
        "workbook sampled"
    );

    Ok(SampleJob {
        bytes,
        seed: sampled.seed,
        sheets: sampled.sheets.iter().map(|s| s.name.clone()).collect(),
        diagnostics: sampled.diagnostics,
    })
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(SteekproefError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: workbook too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_INPUT_BYTES
            ),
        )));
    }
    Ok(std::fs::read(path)?)
}

/// Sample the workbook at `input` and write the result to `output`.
/// Nothing is written when the job fails.
pub fn sample_file(input: &Path, output: &Path, options: &SampleOptions) -> Result<SampleJob> {
    let bytes = read_input(input)?;
    let job = process_with(&bytes, options)?;
    std::fs::write(output, &job.bytes)?;
    Ok(job)
}

/// Sibling of `input` named `<prefix><file name>`. The output is always
/// xlsx, so other extensions are replaced.
pub fn default_output_path(input: &Path, prefix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    let file_name = format!("{}{}.xlsx", prefix, stem);
    input.with_file_name(file_name)
}
