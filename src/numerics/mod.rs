//! numerics — linear-algebra building blocks for benchmarking engines.
//!
//! Purpose
//! -------
//! Collect the matrix-level primitives the Denton engine needs: the
//! coefficients and row-sparse form of the unit-root differencing operator,
//! and a banded LU solver able to handle the symmetric indefinite augmented
//! systems produced by constrained quadratic minimization.
//!
//! Key behaviors
//! -------------
//! - [`differencing`] builds `(1 − B)^d` coefficients and the `D` operator in
//!   its banded ("modified") and square forms, optionally column-scaled.
//! - [`banded`] stores band matrices with room for pivoting fill-in and
//!   solves them by LU with partial pivoting.
//! - [`errors`] defines [`NumericalError`], converted into the benchmarking
//!   error type at the engine boundary.
//!
//! Conventions
//! -----------
//! - Vectors are `ndarray::Array1<f64>`; the kernels never log, perform I/O,
//!   or touch global state.
//! - Singularity is decided once, against [`SINGULAR_PIVOT_TOL`], and is
//!   never silently regularized.

pub mod banded;
pub mod differencing;
pub mod errors;

pub use self::banded::{BandMatrix, SINGULAR_PIVOT_TOL};
pub use self::differencing::{DiffOperator, difference_coefficients};
pub use self::errors::{NumResult, NumericalError};
