//! models — the Denton and Cholette benchmarking engines.
//!
//! Purpose
//! -------
//! Hold the numerical engines that turn an [`Alignment`] (or a pair of
//! series) into a benchmarked series. This layer sits on top of
//! `benchmarking::core` and uses `numerics` (banded solve) and `ssf`
//! (state-space smoothing).
//!
//! Key behaviors
//! -------------
//! - [`DentonEngine`] solves the movement-preservation problem through an
//!   augmented banded system; it reconciles an existing series or
//!   interpolates from constraints alone.
//! - [`CholetteEngine`] smooths the discrepancy between a series and its
//!   targets with an AR(1) / random-walk state-space model.
//!
//! Invariants & assumptions
//! ------------------------
//! - Engines are immutable after construction and hold only their spec, so a
//!   single engine can serve concurrent callers.
//! - Every call allocates its own working buffers.
//!
//! Downstream usage
//! ----------------
//! - Most callers go through `benchmarking::processors`, which trims
//!   missing extremities and restores the caller's time domain. The engines
//!   are public for callers that already hold aligned data.
//!
//! [`Alignment`]: crate::benchmarking::core::Alignment

pub mod cholette;
pub mod denton;

pub use self::cholette::CholetteEngine;
pub use self::denton::DentonEngine;
