//! Whole-workbook sampling.
//!
//! One seed is resolved per run and one generator stream is shared by all
//! sheets, consumed in input order. A sheet that cannot be read is left out
//! and reported; it never stops the run.

use super::sampler::{SampleRng, shuffle_sheet};
use super::seed::{ControlSheet, Seed, SeedOrigin, SeedResolution, resolve_seed};
use super::sheet::{Sheet, SheetError};
use super::workbook::{RawSheet, SampledWorkbook, SheetDiagnostic, Workbook, same_sheet_name};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Per-run settings.
#[derive(Clone, Debug, Default)]
pub struct SampleOptions {
    pub control: ControlSheet,
    /// Seed to use instead of the stored one.
    pub seed: Option<Seed>,
}

impl SampleOptions {
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_control(mut self, control: ControlSheet) -> Self {
        self.control = control;
        self
    }
}

/// What happened to one data sheet.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetOutcome {
    Sampled(Sheet),
    Skipped(SheetDiagnostic),
}

/// Read one raw sheet and shuffle its rows.
///
/// Sheets that fail to read, or that would not fit the output container,
/// consume no keys from `rng`.
pub fn sample_sheet(raw: &RawSheet, rng: &mut SampleRng) -> SheetOutcome {
    let checked = raw
        .to_sheet()
        .and_then(|sheet| sheet.check_limits().map(|()| sheet));
    match checked {
        Ok(sheet) => SheetOutcome::Sampled(shuffle_sheet(sheet, rng)),
        Err(reason) => SheetOutcome::Skipped(SheetDiagnostic {
            sheet: raw.name.clone(),
            reason,
        }),
    }
}

/// The control sheet to write. A stored seed keeps the input's control sheet
/// as it was read; otherwise a fresh one carries the new seed.
fn control_sheet(
    workbook: &Workbook,
    options: &SampleOptions,
    resolution: SeedResolution,
) -> Sheet {
    let stored = match resolution.origin {
        SeedOrigin::Stored => workbook
            .sheet(&options.control.sheet_name)
            .and_then(|raw| raw.to_sheet().ok())
            .filter(|sheet| sheet.check_limits().is_ok()),
        SeedOrigin::Minted | SeedOrigin::Supplied => None,
    };
    stored.unwrap_or_else(|| options.control.build_sheet(resolution.seed))
}

/// Sample every data sheet of `workbook`.
///
/// The output holds the control sheet exactly once: at the position of the
/// input's control sheet when there was one, first otherwise. Sheet names are
/// matched without regard to case. Data sheets keep their input order; skipped
/// ones are listed in `diagnostics`.
pub fn sample_workbook(workbook: &Workbook, options: &SampleOptions) -> SampledWorkbook {
    let resolution = match options.seed {
        Some(seed) => SeedResolution {
            seed,
            origin: SeedOrigin::Supplied,
        },
        None => resolve_seed(workbook, &options.control),
    };
    let mut rng = SampleRng::from_seed(resolution.seed);

    let control_name = options.control.sheet_name.as_str();
    let mut control = Some(control_sheet(workbook, options, resolution));
    let mut sheets: Vec<Sheet> = Vec::with_capacity(workbook.sheets.len() + 1);
    let mut diagnostics: Vec<SheetDiagnostic> = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    taken.insert(control_name.to_lowercase());

    if workbook.sheet_position(control_name).is_none() {
        sheets.extend(control.take());
    }

    for raw in &workbook.sheets {
        if same_sheet_name(&raw.name, control_name) && control.is_some() {
            sheets.extend(control.take());
            continue;
        }

        let outcome = if taken.insert(raw.name.to_lowercase()) {
            sample_sheet(raw, &mut rng)
        } else {
            SheetOutcome::Skipped(SheetDiagnostic {
                sheet: raw.name.clone(),
                reason: SheetError::DuplicateSheetName(raw.name.clone()),
            })
        };

        match outcome {
            SheetOutcome::Sampled(sheet) => {
                debug!(sheet = %sheet.name, rows = sheet.rows.len(), "sheet sampled");
                sheets.push(sheet);
            }
            SheetOutcome::Skipped(diagnostic) => {
                warn!(sheet = %diagnostic.sheet, reason = %diagnostic.reason, "sheet skipped");
                diagnostics.push(diagnostic);
            }
        }
    }

    SampledWorkbook {
        sheets,
        seed: resolution,
        diagnostics,
    }
}
