//! Seed resolution.
//!
//! A run's seed either comes from the control sheet of the input workbook
//! (so a previous run can be reproduced) or is minted fresh. Minting is the
//! normal path for a first run and is not an error.

use super::cell::{CellValue, format_number};
use super::sheet::{Row, Sheet};
use super::workbook::Workbook;
use rand::Rng;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Reserved sheet name holding the seed.
pub const DEFAULT_CONTROL_SHEET: &str = "Setup";
/// Reserved column name inside the control sheet.
pub const DEFAULT_SEED_COLUMN: &str = "Random Seed";

/// A run seed in `[0, Seed::MAX]`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Seed(u32);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeedError {
    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    #[error("{0} is outside 0..={max}", max = Seed::MAX)]
    OutOfRange(String),
}

impl Seed {
    pub const MAX: u32 = 999_999_999;

    pub fn new(value: u64) -> Option<Seed> {
        if value <= Seed::MAX as u64 {
            Some(Seed(value as u32))
        } else {
            None
        }
    }

    /// Draw a fresh seed from process entropy.
    pub fn mint() -> Seed {
        Seed(rand::thread_rng().gen_range(0..=Seed::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Interpret a numeric cell as a seed.
    pub fn from_number(n: f64) -> Result<Seed, SeedError> {
        if !n.is_finite() || n.fract() != 0.0 {
            return Err(SeedError::NotAnInteger(format_number(n)));
        }
        if n < 0.0 || n > Seed::MAX as f64 {
            return Err(SeedError::OutOfRange(format_number(n)));
        }
        Ok(Seed(n as u32))
    }
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?<digits>[0-9]+)\s*$").expect("valid regex"))
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = digits_re()
            .captures(s)
            .ok_or_else(|| SeedError::NotAnInteger(s.to_string()))?;
        let digits = &caps["digits"];
        digits
            .parse::<u64>()
            .ok()
            .and_then(Seed::new)
            .ok_or_else(|| SeedError::OutOfRange(digits.to_string()))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the seed of a run came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeedOrigin {
    /// Read from the input's control sheet.
    Stored,
    /// Freshly drawn because no usable seed was stored.
    Minted,
    /// Handed in by the caller.
    Supplied,
}

impl fmt::Display for SeedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeedOrigin::Stored => "from control sheet",
            SeedOrigin::Minted => "new",
            SeedOrigin::Supplied => "supplied",
        };
        f.write_str(label)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SeedResolution {
    pub seed: Seed,
    pub origin: SeedOrigin,
}

/// Why a workbook carries no usable stored seed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlSheetError {
    #[error("no '{0}' sheet")]
    Missing(String),

    #[error("control sheet unreadable: {0}")]
    Unreadable(String),

    #[error("no '{0}' column")]
    NoSeedColumn(String),

    #[error("no seed value")]
    NoSeedValue,

    #[error("invalid seed: {0}")]
    InvalidSeed(#[from] SeedError),
}

/// Names of the reserved sheet and column. Both sides of a round trip must agree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControlSheet {
    pub sheet_name: String,
    pub seed_column: String,
}

impl Default for ControlSheet {
    fn default() -> Self {
        ControlSheet {
            sheet_name: DEFAULT_CONTROL_SHEET.to_string(),
            seed_column: DEFAULT_SEED_COLUMN.to_string(),
        }
    }
}

impl ControlSheet {
    pub fn new(sheet_name: impl Into<String>, seed_column: impl Into<String>) -> Self {
        ControlSheet {
            sheet_name: sheet_name.into(),
            seed_column: seed_column.into(),
        }
    }

    /// The control sheet as written to output: one column, one row.
    pub fn build_sheet(&self, seed: Seed) -> Sheet {
        Sheet::new(
            self.sheet_name.clone(),
            vec![self.seed_column.clone()],
            vec![Row::new(vec![CellValue::Number(seed.value() as f64)])],
        )
    }
}

/// Read the seed stored in `workbook`'s control sheet.
///
/// Extra columns and rows in the control sheet are ignored; only the first data
/// row of the seed column counts.
pub fn read_stored_seed(workbook: &Workbook, control: &ControlSheet) -> Result<Seed, ControlSheetError> {
    let raw = workbook
        .sheet(&control.sheet_name)
        .ok_or_else(|| ControlSheetError::Missing(control.sheet_name.clone()))?;
    let sheet = raw
        .to_sheet()
        .map_err(|e| ControlSheetError::Unreadable(e.to_string()))?;
    let col = sheet
        .column_index(&control.seed_column)
        .ok_or_else(|| ControlSheetError::NoSeedColumn(control.seed_column.clone()))?;

    match sheet.rows.first().and_then(|row| row.values.get(col)) {
        None | Some(CellValue::Empty) => Err(ControlSheetError::NoSeedValue),
        Some(CellValue::Number(n)) => Ok(Seed::from_number(*n)?),
        Some(CellValue::Text(s)) => Ok(s.parse::<Seed>()?),
        Some(CellValue::DateTime(serial)) => {
            Err(SeedError::NotAnInteger(format_number(*serial)).into())
        }
    }
}

/// Resolve the seed for a run: the stored one if usable, otherwise a new one.
pub fn resolve_seed(workbook: &Workbook, control: &ControlSheet) -> SeedResolution {
    match read_stored_seed(workbook, control) {
        Ok(seed) => {
            debug!(seed = seed.value(), "using stored seed");
            SeedResolution {
                seed,
                origin: SeedOrigin::Stored,
            }
        }
        Err(reason) => {
            let seed = Seed::mint();
            debug!(seed = seed.value(), %reason, "no stored seed, minted a new one");
            SeedResolution {
                seed,
                origin: SeedOrigin::Minted,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RawSheet;

    fn control_workbook(value: CellValue) -> Workbook {
        Workbook::new(vec![RawSheet::new(
            DEFAULT_CONTROL_SHEET,
            vec![vec![CellValue::text(DEFAULT_SEED_COLUMN)], vec![value]],
        )])
    }

    #[test]
    fn test_seed_bounds() {
        assert_eq!(Seed::new(0).map(Seed::value), Some(0));
        assert_eq!(Seed::new(999_999_999).map(Seed::value), Some(999_999_999));
        assert!(Seed::new(1_000_000_000).is_none());
    }

    #[test]
    fn test_minted_seeds_in_range() {
        for _ in 0..1000 {
            assert!(Seed::mint().value() <= Seed::MAX);
        }
    }

    #[test]
    fn test_parse_seed_text() {
        assert_eq!("42".parse::<Seed>(), Ok(Seed(42)));
        assert_eq!(" 7 ".parse::<Seed>(), Ok(Seed(7)));
        assert!(matches!("4.2".parse::<Seed>(), Err(SeedError::NotAnInteger(_))));
        assert!(matches!("-1".parse::<Seed>(), Err(SeedError::NotAnInteger(_))));
        assert!(matches!("abc".parse::<Seed>(), Err(SeedError::NotAnInteger(_))));
        assert!(matches!("".parse::<Seed>(), Err(SeedError::NotAnInteger(_))));
        assert!(matches!(
            "1000000000".parse::<Seed>(),
            Err(SeedError::OutOfRange(_))
        ));
        assert!(matches!(
            "99999999999999999999999".parse::<Seed>(),
            Err(SeedError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_seed_from_number() {
        assert_eq!(Seed::from_number(42.0), Ok(Seed(42)));
        assert!(matches!(Seed::from_number(4.5), Err(SeedError::NotAnInteger(_))));
        assert!(matches!(Seed::from_number(-1.0), Err(SeedError::OutOfRange(_))));
        assert!(matches!(Seed::from_number(1e9), Err(SeedError::OutOfRange(_))));
        assert!(matches!(
            Seed::from_number(f64::NAN),
            Err(SeedError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_read_stored_seed_number() {
        let wb = control_workbook(CellValue::Number(123.0));
        assert_eq!(read_stored_seed(&wb, &ControlSheet::default()), Ok(Seed(123)));
    }

    #[test]
    fn test_read_stored_seed_text() {
        let wb = control_workbook(CellValue::text("987654321"));
        assert_eq!(
            read_stored_seed(&wb, &ControlSheet::default()),
            Ok(Seed(987_654_321))
        );
    }

    #[test]
    fn test_read_stored_seed_missing_sheet() {
        let wb = Workbook::default();
        assert_eq!(
            read_stored_seed(&wb, &ControlSheet::default()),
            Err(ControlSheetError::Missing("Setup".to_string()))
        );
    }

    #[test]
    fn test_read_stored_seed_empty_sheet() {
        let wb = Workbook::new(vec![RawSheet::new(DEFAULT_CONTROL_SHEET, Vec::new())]);
        assert!(matches!(
            read_stored_seed(&wb, &ControlSheet::default()),
            Err(ControlSheetError::Unreadable(_))
        ));
    }

    #[test]
    fn test_read_stored_seed_header_only() {
        let wb = Workbook::new(vec![RawSheet::new(
            DEFAULT_CONTROL_SHEET,
            vec![vec![CellValue::text(DEFAULT_SEED_COLUMN)]],
        )]);
        assert_eq!(
            read_stored_seed(&wb, &ControlSheet::default()),
            Err(ControlSheetError::NoSeedValue)
        );
    }

    #[test]
    fn test_read_stored_seed_wrong_column() {
        let wb = Workbook::new(vec![RawSheet::new(
            DEFAULT_CONTROL_SHEET,
            vec![vec![CellValue::text("Seed")], vec![CellValue::Number(1.0)]],
        )]);
        assert_eq!(
            read_stored_seed(&wb, &ControlSheet::default()),
            Err(ControlSheetError::NoSeedColumn("Random Seed".to_string()))
        );
    }

    #[test]
    fn test_read_stored_seed_malformed_values() {
        for value in [
            CellValue::text("not a seed"),
            CellValue::Number(1.5),
            CellValue::Number(-3.0),
            CellValue::Number(2e9),
            CellValue::DateTime(45321.0),
        ] {
            let wb = control_workbook(value);
            assert!(matches!(
                read_stored_seed(&wb, &ControlSheet::default()),
                Err(ControlSheetError::InvalidSeed(_))
            ));
        }
    }

    #[test]
    fn test_read_stored_seed_ignores_extra_columns() {
        let wb = Workbook::new(vec![RawSheet::new(
            DEFAULT_CONTROL_SHEET,
            vec![
                vec![CellValue::text("Note"), CellValue::text(DEFAULT_SEED_COLUMN)],
                vec![CellValue::text("audit"), CellValue::Number(5.0)],
            ],
        )]);
        assert_eq!(read_stored_seed(&wb, &ControlSheet::default()), Ok(Seed(5)));
    }

    #[test]
    fn test_custom_control_names() {
        let control = ControlSheet::new("Config", "Seed");
        let wb = Workbook::new(vec![RawSheet::new(
            "Config",
            vec![vec![CellValue::text("Seed")], vec![CellValue::Number(9.0)]],
        )]);
        assert_eq!(read_stored_seed(&wb, &control), Ok(Seed(9)));
        assert!(read_stored_seed(&wb, &ControlSheet::default()).is_err());
    }

    #[test]
    fn test_resolve_seed_stored() {
        let wb = control_workbook(CellValue::Number(42.0));
        let resolved = resolve_seed(&wb, &ControlSheet::default());
        assert_eq!(resolved.seed, Seed(42));
        assert_eq!(resolved.origin, SeedOrigin::Stored);
    }

    #[test]
    fn test_resolve_seed_mints_when_malformed() {
        let wb = control_workbook(CellValue::text("oops"));
        let resolved = resolve_seed(&wb, &ControlSheet::default());
        assert_eq!(resolved.origin, SeedOrigin::Minted);
        assert!(resolved.seed.value() <= Seed::MAX);
    }

    #[test]
    fn test_build_sheet() {
        let sheet = ControlSheet::default().build_sheet(Seed(42));
        assert_eq!(sheet.name, "Setup");
        assert_eq!(sheet.columns, vec!["Random Seed"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.value(0, "Random Seed"), Some(&CellValue::Number(42.0)));
    }
}
