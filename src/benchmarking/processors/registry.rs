//! registry — process-wide active processors and the dispatching facade.
//!
//! Purpose
//! -------
//! Keep one active [`DentonProcessor`] and one active [`CholetteProcessor`]
//! for the whole process, initialized to the built-in implementations and
//! replaceable at configuration time. The free functions [`denton`],
//! [`denton_interpolation`], [`cholette`] and the batch variants dispatch
//! through the active implementation.
//!
//! Key behaviors
//! -------------
//! - Each slot is an `Arc<dyn …>` behind an `RwLock` in a `LazyLock`
//!   static. Readers clone the `Arc` and release the lock before computing,
//!   so a long benchmark never blocks a swap and a swap never interrupts a
//!   running benchmark.
//! - A poisoned lock still holds a valid `Arc`; it is recovered rather than
//!   propagated.
//! - Batch functions resolve the processor once and reject slices of
//!   different lengths before any work is done.
use crate::benchmarking::{
    core::{
        options::{CholetteSpec, DentonSpec},
        series::TsData,
        units::TsUnit,
    },
    errors::{BenchError, BenchResult},
    processors::{
        CholetteProcessor, DefaultCholetteProcessor, DefaultDentonProcessor, DentonProcessor,
        HighFrequency,
    },
};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

static DENTON: LazyLock<RwLock<Arc<dyn DentonProcessor>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultDentonProcessor)));

static CHOLETTE: LazyLock<RwLock<Arc<dyn CholetteProcessor>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultCholetteProcessor)));

/// Currently active Denton processor.
pub fn denton_processor() -> Arc<dyn DentonProcessor> {
    DENTON.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replace the active Denton processor; returns the previous one.
pub fn set_denton_processor(processor: Arc<dyn DentonProcessor>) -> Arc<dyn DentonProcessor> {
    debug!(?processor, "installing denton processor");
    let mut slot = DENTON.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, processor)
}

/// Currently active Cholette processor.
pub fn cholette_processor() -> Arc<dyn CholetteProcessor> {
    CHOLETTE.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replace the active Cholette processor; returns the previous one.
pub fn set_cholette_processor(processor: Arc<dyn CholetteProcessor>) -> Arc<dyn CholetteProcessor> {
    debug!(?processor, "installing cholette processor");
    let mut slot = CHOLETTE.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, processor)
}

/// Denton reconciliation of `high` with `low`.
pub fn denton(high: &TsData, low: &TsData, spec: &DentonSpec) -> BenchResult<TsData> {
    denton_processor().benchmark(HighFrequency::Series(high), low, spec)
}

/// Denton interpolation of `low` to `unit`.
pub fn denton_interpolation(unit: TsUnit, low: &TsData, spec: &DentonSpec) -> BenchResult<TsData> {
    denton_processor().benchmark(HighFrequency::Unit(unit), low, spec)
}

/// Cholette benchmarking of `high` to `low`.
pub fn cholette(high: &TsData, low: &TsData, spec: &CholetteSpec) -> BenchResult<TsData> {
    cholette_processor().benchmark(high, low, spec)
}

/// Denton reconciliation of each `highs[i]` with `lows[i]`.
///
/// Errors
/// ------
/// - `BenchError::BatchLengthMismatch` when the slices differ in length.
/// - The first error of any pair; later pairs are not processed.
pub fn denton_batch(highs: &[TsData], lows: &[TsData], spec: &DentonSpec) -> BenchResult<Vec<TsData>> {
    check_batch(highs.len(), lows.len())?;
    let processor = denton_processor();
    highs
        .iter()
        .zip(lows.iter())
        .map(|(high, low)| processor.benchmark(HighFrequency::Series(high), low, spec))
        .collect()
}

/// Cholette benchmarking of each `highs[i]` to `lows[i]`.
///
/// Errors
/// ------
/// - `BenchError::BatchLengthMismatch` when the slices differ in length.
/// - The first error of any pair; later pairs are not processed.
pub fn cholette_batch(highs: &[TsData], lows: &[TsData], spec: &CholetteSpec) -> BenchResult<Vec<TsData>> {
    check_batch(highs.len(), lows.len())?;
    let processor = cholette_processor();
    highs.iter().zip(lows.iter()).map(|(high, low)| processor.benchmark(high, low, spec)).collect()
}

fn check_batch(high: usize, low: usize) -> BenchResult<()> {
    if high != low {
        return Err(BenchError::BatchLengthMismatch { high, low });
    }
    Ok(())
}
