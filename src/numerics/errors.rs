//! numerics::errors — failures raised by the linear-algebra and smoothing kernels.
//!
//! Purpose
//! -------
//! Give the numerical building blocks (banded LU, state-space filter) an error
//! surface of their own, independent of the benchmarking layer that calls
//! them. Callers in `benchmarking` convert these into
//! `BenchError::Numerical` via `From`, so every failure here is reported to
//! users as a numerical failure.
//!
//! Conventions
//! -----------
//! - Indices are 0-based and refer to the row/time index of the structure
//!   being processed at the point of failure (permuted row for the banded
//!   solver, time index for the filter).
//! - Errors are small `Clone + PartialEq` values so tests can match on them.
use thiserror::Error;

/// Result alias for numerical kernels.
pub type NumResult<T> = Result<T, NumericalError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericalError {
    // ---- Shape ----
    /// Right-hand side length does not match the matrix order.
    #[error("Right-hand side has length {found}, expected {expected}.")]
    DimensionMismatch { expected: usize, found: usize },

    /// A system of order zero was requested.
    #[error("Cannot solve an empty linear system.")]
    EmptySystem,

    // ---- Banded LU ----
    /// No acceptable pivot was found in the given column.
    #[error("Linear system is singular: pivot {pivot:e} at row {index} is below tolerance {tolerance:e}.")]
    SingularMatrix { index: usize, pivot: f64, tolerance: f64 },

    /// Solution contains NaN or ±∞.
    #[error("Linear solve produced a non-finite value at index {index}: {value}")]
    NonFiniteSolution { index: usize, value: f64 },

    // ---- State space ----
    /// An observed point carries no information (zero innovation variance)
    /// while its innovation is non-zero, so it cannot be reproduced.
    #[error(
        "Observation at t = {t} has degenerate innovation variance {variance:e} with innovation {innovation}."
    )]
    DegenerateObservation { t: usize, variance: f64, innovation: f64 },

    /// Data length differs from the state-space model length.
    #[error("State-space model covers {expected} periods but data has {found}.")]
    LengthMismatch { expected: usize, found: usize },

    /// Filter or smoother produced NaN or ±∞.
    #[error("State-space recursion produced a non-finite value at t = {t}.")]
    NonFiniteState { t: usize },
}
