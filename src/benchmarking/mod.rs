//! benchmarking — reconcile high-frequency series with low-frequency totals.
//!
//! Purpose
//! -------
//! Adjust a high-frequency series so that it aggregates exactly to given
//! low-frequency constraints (sums, averages, first/last or a chosen period
//! of each block) while staying as close as possible to its own movement.
//! Two methods are provided: Denton (constrained quadratic minimization of
//! differences) and Cholette (state-space smoothing of the discrepancy).
//!
//! Key behaviors
//! -------------
//! - [`core`] defines units and ratios, the [`TsData`] series container,
//!   [`AggregationType`], constraint alignment ([`ConstraintAligner`]) and
//!   the method options ([`DentonSpec`], [`CholetteSpec`]).
//! - [`models`] holds the engines ([`DentonEngine`], [`CholetteEngine`]).
//! - [`processors`] exposes the capability traits, their built-in
//!   implementations and the process-wide registry with facade functions
//!   ([`denton`], [`denton_interpolation`], [`cholette`], batch variants).
//!
//! Invariants & assumptions
//! ------------------------
//! - The high/low frequency ratio is an integer ≥ 2; anything else is an
//!   [`ErrorKind::IncompatibleFrequency`] error.
//! - Results meet every usable constraint to solver precision (≈ 1e-9
//!   relative) and cover the caller's high-frequency domain.
//! - Computations are pure: no global state except the active-processor
//!   slots, which are only read during dispatch.
//!
//! Conventions
//! -----------
//! - Missing values are `NaN`; leading/trailing missing values of the
//!   high-frequency series are trimmed and restored as missing.
//! - Errors are reported as [`BenchError`]; [`BenchError::kind`] gives the
//!   coarse class (incompatible frequency, invalid operation, numerical
//!   failure).
//! - The library emits `tracing` events (`debug` at dispatch, `trace` for
//!   solver sizes, `warn` when nothing constrains the series) and never
//!   installs a subscriber.
//!
//! Testing notes
//! -------------
//! - Unit tests next to each module cover alignment, validation, engine
//!   accuracy against dense reference solves and registry behavior.
//! - `tests/integration_benchmarking.rs` runs end-to-end scenarios through
//!   the public facade.

pub mod core;
pub mod errors;
pub mod models;
pub mod processors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AggregationType, Alignment, BiasCorrection, CholetteSpec, ConstraintAligner, DentonSpec, TsData,
    TsUnit, ratio_of,
};

pub use self::errors::{BenchError, BenchResult, ErrorKind};

pub use self::models::{CholetteEngine, DentonEngine};

pub use self::processors::registry::{
    cholette, cholette_batch, cholette_processor, denton, denton_batch, denton_interpolation,
    denton_processor, set_cholette_processor, set_denton_processor,
};
pub use self::processors::{
    CholetteProcessor, DefaultCholetteProcessor, DefaultDentonProcessor, DentonProcessor,
    HighFrequency,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_benchmarking::benchmarking::prelude::*;

pub mod prelude {
    pub use super::{
        AggregationType, BenchError, BenchResult, BiasCorrection, CholetteSpec, DentonSpec,
        ErrorKind, HighFrequency, TsData, TsUnit, cholette, denton, denton_interpolation,
    };
}
