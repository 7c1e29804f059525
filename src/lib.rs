//! rust_benchmarking — temporal benchmarking of time series.
//!
//! Purpose
//! -------
//! Serve as the crate root for benchmarking high-frequency series to
//! low-frequency totals with the Denton and Cholette methods.
//!
//! Key behaviors
//! -------------
//! - [`benchmarking`] is the public surface: series and units, aggregation
//!   rules, options, engines, processors and the dispatching facade.
//! - [`numerics`] provides the differencing operators and the banded LU
//!   solver behind the Denton engine.
//! - [`ssf`] provides the state-space model variants and the Kalman
//!   filter/smoother behind the Cholette engine.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is deterministic: identical inputs give
//!   bit-identical outputs.
//! - Numerical kernels report [`numerics::NumericalError`]; the benchmarking
//!   layer wraps those into [`benchmarking::BenchError`].
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_benchmarking::benchmarking::prelude::*;
//!
//! let quarterly = TsData::from_year(TsUnit::QUARTERLY, 2000, 0, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
//! let annual = TsData::from_year(TsUnit::YEARLY, 2000, 0, &[12.0, 24.0]);
//! let out = denton(&quarterly, &annual, &DentonSpec::default()).unwrap();
//! let first_year: f64 = out.values().iter().take(4).sum();
//! assert!((first_year - 12.0).abs() < 1e-9);
//! ```

pub mod benchmarking;
pub mod numerics;
pub mod ssf;
