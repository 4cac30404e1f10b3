//! steekproef_engine - Reproducible multi-sheet row sampling.

pub mod engine;
