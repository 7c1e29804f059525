//! Benchmarking validation helpers — parameter and input checks.
//!
//! Purpose
//! -------
//! Centralize the checks that run before any operator or state-space model is
//! built, so engines can assume well-formed inputs and every failure path is
//! free of side effects.
//!
//! Conventions
//! -----------
//! - Helpers return [`BenchResult`] and never panic on invalid inputs.
//! - Indices in errors refer to the series as passed to the helper.
//! - No logging happens here; callers decide what to report.
use crate::benchmarking::errors::{BenchError, BenchResult};
use ndarray::ArrayView1;

/// Differencing order must be at least 1.
pub fn validate_differencing(order: usize) -> BenchResult<usize> {
    if order == 0 {
        return Err(BenchError::InvalidDifferencing { order });
    }
    Ok(order)
}

/// Autoregressive parameter must lie in `(0, 1]`.
pub fn validate_rho(rho: f64) -> BenchResult<f64> {
    if !(rho > 0.0 && rho <= 1.0) {
        return Err(BenchError::InvalidRho { rho });
    }
    Ok(rho)
}

/// Weighting exponent must be finite and non-negative.
pub fn validate_lambda(lambda: f64) -> BenchResult<f64> {
    if !(lambda.is_finite() && lambda >= 0.0) {
        return Err(BenchError::InvalidLambda { lambda });
    }
    Ok(lambda)
}

/// Reject ±∞; `NaN` (missing) is allowed.
pub fn validate_no_infinite(values: ArrayView1<'_, f64>) -> BenchResult<()> {
    match values.iter().position(|v| v.is_infinite()) {
        Some(index) => Err(BenchError::NonFiniteData { index, value: values[index] }),
        None => Ok(()),
    }
}

/// Reject missing values, used on series already trimmed of extremities.
///
/// `shift` is added to reported indices so that they refer to the caller's
/// untrimmed series.
pub fn validate_no_missing(values: ArrayView1<'_, f64>, shift: usize) -> BenchResult<()> {
    match values.iter().position(|v| v.is_nan()) {
        Some(index) => Err(BenchError::InteriorMissing { index: index + shift }),
        None => Ok(()),
    }
}

/// Multiplicative reference values must be non-zero.
pub fn validate_nonzero(values: ArrayView1<'_, f64>, shift: usize) -> BenchResult<()> {
    match values.iter().position(|&v| v == 0.0) {
        Some(index) => Err(BenchError::ZeroReference { index: index + shift }),
        None => Ok(()),
    }
}

/// The banded differencing operator needs more periods than its order.
pub fn validate_length(len: usize, order: usize, modified: bool) -> BenchResult<()> {
    if len == 0 {
        return Err(BenchError::EmptySeries);
    }
    if modified && len <= order {
        return Err(BenchError::SeriesTooShort { len, order });
    }
    Ok(())
}
