//! processors — benchmarking entry points and the active-implementation slot.
//!
//! Purpose
//! -------
//! Expose one capability trait per method, [`DentonProcessor`] and
//! [`CholetteProcessor`], each with a single `benchmark` operation working
//! on whole series. The built-in implementations check frequencies, trim
//! missing extremities, dispatch to the engines in
//! `benchmarking::models` and put the result back on the caller's domain.
//!
//! Key behaviors
//! -------------
//! - [`HighFrequency`] selects Denton reconciliation (a reference series) or
//!   interpolation (a bare unit).
//! - [`registry`] holds the process-wide active implementation of each
//!   trait, swappable at configuration time, plus facade and batch
//!   functions that dispatch through it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementations are `Send + Sync` and keep no per-call state; the same
//!   instance serves every concurrent caller.
//! - All validation happens before any matrix or model is built.

pub mod cholette;
pub mod denton;
pub mod registry;

use crate::benchmarking::{
    core::{
        options::{CholetteSpec, DentonSpec},
        series::TsData,
        units::TsUnit,
    },
    errors::BenchResult,
};
use std::fmt::Debug;

pub use self::cholette::DefaultCholetteProcessor;
pub use self::denton::DefaultDentonProcessor;

/// High-frequency side of a Denton call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighFrequency<'a> {
    /// Reference series to reconcile with the constraints.
    Series(&'a TsData),
    /// Target unit for interpolation from the constraints alone.
    Unit(TsUnit),
}

impl HighFrequency<'_> {
    pub fn unit(&self) -> TsUnit {
        match self {
            HighFrequency::Series(s) => s.unit(),
            HighFrequency::Unit(u) => *u,
        }
    }
}

impl<'a> From<&'a TsData> for HighFrequency<'a> {
    fn from(series: &'a TsData) -> Self {
        HighFrequency::Series(series)
    }
}

impl From<TsUnit> for HighFrequency<'_> {
    fn from(unit: TsUnit) -> Self {
        HighFrequency::Unit(unit)
    }
}

/// Denton benchmarking capability.
pub trait DentonProcessor: Send + Sync + Debug {
    /// Benchmark (or interpolate) to the constraints in `low`.
    ///
    /// For [`HighFrequency::Series`] the result covers the domain of the
    /// reference series; for [`HighFrequency::Unit`] it starts at the first
    /// non-missing low period and spans all of them.
    fn benchmark(&self, high: HighFrequency<'_>, low: &TsData, spec: &DentonSpec) -> BenchResult<TsData>;
}

/// Cholette benchmarking capability.
pub trait CholetteProcessor: Send + Sync + Debug {
    /// Benchmark `high` to the constraints in `low`; the result covers the
    /// domain of `high`.
    fn benchmark(&self, high: &TsData, low: &TsData, spec: &CholetteSpec) -> BenchResult<TsData>;
}
