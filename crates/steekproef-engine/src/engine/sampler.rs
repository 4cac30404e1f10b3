//! Seeded row shuffling.
//!
//! Every surviving row gets one sample key drawn from the run's generator, in
//! row order; rows are then stable-sorted by key. The generator algorithm is
//! pinned to ChaCha8 seeded through `SeedableRng::seed_from_u64`, so a seed
//! gives the same permutation on every platform and build.

use super::seed::Seed;
use super::sheet::{Row, Sheet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The single generator stream of a sampling run.
///
/// Sheets draw from it one after another, so the order in which sheets and
/// rows are visited is part of the output.
#[derive(Clone, Debug)]
pub struct SampleRng {
    inner: ChaCha8Rng,
    draws: u64,
}

impl SampleRng {
    pub fn from_seed(seed: Seed) -> Self {
        SampleRng {
            inner: ChaCha8Rng::seed_from_u64(seed.value() as u64),
            draws: 0,
        }
    }

    /// Next sample key in `[0, 1)`.
    pub fn next_key(&mut self) -> f64 {
        self.draws += 1;
        self.inner.r#gen::<f64>()
    }

    /// Number of keys drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

/// Shuffle data rows (header excluded). Fully empty rows are dropped first
/// and consume no key.
pub fn shuffle(rows: Vec<Row>, rng: &mut SampleRng) -> Vec<Row> {
    let mut keyed: Vec<(f64, Row)> = rows
        .into_iter()
        .filter(|row| !row.is_empty())
        .map(|row| (rng.next_key(), row))
        .collect();

    // Vec::sort_by is stable: equal keys keep their input order.
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Shuffle a whole sheet, keeping its name and header.
pub fn shuffle_sheet(sheet: Sheet, rng: &mut SampleRng) -> Sheet {
    let Sheet {
        name,
        columns,
        rows,
    } = sheet;
    Sheet {
        name,
        columns,
        rows: shuffle(rows, rng),
    }
}
