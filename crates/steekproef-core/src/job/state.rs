use steekproef_engine::engine::{SeedResolution, SheetDiagnostic};

/// Outcome of one sampling job.
#[derive(Clone, Debug)]
pub struct SampleJob {
    /// Encoded output workbook.
    pub bytes: Vec<u8>,
    /// Seed that drove the run, and where it came from.
    pub seed: SeedResolution,
    /// Names of the sheets written, control sheet included.
    pub sheets: Vec<String>,
    /// Sheets left out of the output.
    pub diagnostics: Vec<SheetDiagnostic>,
}

impl SampleJob {
    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
