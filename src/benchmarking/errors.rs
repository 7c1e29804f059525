//! Errors for temporal benchmarking (frequency checks, spec validation,
//! numerical failures).
//!
//! This module defines the crate-level error type, [`BenchError`], and its
//! coarse classification, [`ErrorKind`]. Every public benchmarking entry
//! point returns [`BenchResult`].
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the high-frequency
//!   series as passed by the caller (before extremity trimming).
//! - Frequencies are reported as periods per year.
//! - Kernel failures ([`NumericalError`]) are wrapped unchanged in
//!   [`BenchError::Numerical`].
use crate::{benchmarking::core::aggregation::AggregationType, numerics::errors::NumericalError};
use thiserror::Error;

/// Crate-wide result alias for benchmarking operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// High/low frequency ratio is not an integer ≥ 2.
    IncompatibleFrequency,
    /// Unsupported aggregation, malformed spec or unusable input.
    InvalidOperation,
    /// Singular system or failed smoothing.
    NumericalFailure,
}

/// Unified error type for benchmarking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    // ---- Frequencies ----
    /// High frequency is not an exact multiple (≥ 2) of the low frequency.
    #[error(
        "Incompatible frequencies: {high} periods per year cannot be aggregated to {low} periods per year."
    )]
    IncompatibleFrequency { high: usize, low: usize },

    /// A unit with zero periods per year.
    #[error("Invalid unit: periods per year must be at least 1.")]
    InvalidUnit,

    // ---- Spec / options ----
    /// Differencing order must be ≥ 1.
    #[error("Differencing order must be at least 1, got {order}.")]
    InvalidDifferencing { order: usize },

    /// Autoregressive parameter outside (0, 1].
    #[error("Autoregressive parameter must lie in (0, 1], got {rho}.")]
    InvalidRho { rho: f64 },

    /// Weighting exponent negative or non-finite.
    #[error("Weighting exponent must be finite and non-negative, got {lambda}.")]
    InvalidLambda { lambda: f64 },

    /// User-defined observation position outside the block.
    #[error("Observation position {position} is outside a block of {ratio} periods.")]
    InvalidPosition { position: usize, ratio: usize },

    /// Alignment built under a different aggregation rule than the engine's.
    #[error("Constraints were aligned for aggregation {found}, but the engine is configured for {expected}.")]
    AggregationMismatch { expected: AggregationType, found: AggregationType },

    /// Name that does not match any enumerated option.
    #[error("Unknown {what}: '{name}'.")]
    UnknownOption { what: &'static str, name: String },

    // ---- Input data ----
    /// High-frequency series is empty or entirely missing.
    #[error("High-frequency series has no observations.")]
    EmptySeries,

    /// Missing value strictly inside the high-frequency series.
    #[error("High-frequency series has a missing value at index {index}.")]
    InteriorMissing { index: usize },

    /// Non-finite (±∞) value in an input series.
    #[error("Series contains a non-finite value at index {index}: {value}")]
    NonFiniteData { index: usize, value: f64 },

    /// Multiplicative reference value equal to zero.
    #[error("Multiplicative benchmarking requires non-zero values; found zero at index {index}.")]
    ZeroReference { index: usize },

    /// Series too short for the requested differencing order.
    #[error("Series of length {len} is too short for differencing of order {order}.")]
    SeriesTooShort { len: usize, order: usize },

    /// Bias correction has no overlapping constraint to estimate from.
    #[error("{what} bias correction is undefined: {reason}.")]
    UndefinedBias { what: &'static str, reason: &'static str },

    /// Parallel batch inputs of different lengths.
    #[error("Batch input lengths differ: {high} high-frequency series, {low} constraints.")]
    BatchLengthMismatch { high: usize, low: usize },

    // ---- Numerics ----
    /// Failure inside the linear solver or the smoother.
    #[error("Numerical failure: {0}")]
    Numerical(#[from] NumericalError),
}

impl BenchError {
    /// Failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BenchError::IncompatibleFrequency { .. } => ErrorKind::IncompatibleFrequency,
            BenchError::Numerical(_) => ErrorKind::NumericalFailure,
            _ => ErrorKind::InvalidOperation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Kernel errors must classify as numerical failures once converted.
    fn numerical_errors_convert_and_classify() {
        // Arrange
        let inner = NumericalError::SingularMatrix { index: 3, pivot: 0.0, tolerance: 1e-12 };

        // Act
        let err: BenchError = inner.clone().into();

        // Assert
        assert_eq!(err, BenchError::Numerical(inner));
        assert_eq!(err.kind(), ErrorKind::NumericalFailure);
        assert!(err.to_string().starts_with("Numerical failure:"));
    }

    #[test]
    fn error_kinds_partition_variants() {
        assert_eq!(
            BenchError::IncompatibleFrequency { high: 12, low: 5 }.kind(),
            ErrorKind::IncompatibleFrequency
        );
        assert_eq!(BenchError::InvalidRho { rho: 1.5 }.kind(), ErrorKind::InvalidOperation);
        assert_eq!(
            BenchError::UnknownOption { what: "aggregation type", name: "Median".into() }.kind(),
            ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn incompatible_frequency_display_names_both_units() {
        let msg = BenchError::IncompatibleFrequency { high: 12, low: 5 }.to_string();
        assert!(msg.contains("12") && msg.contains("5"), "Got: {msg}");
    }
}
