//! ssf — state-space forms and smoothing for benchmarking.
//!
//! Purpose
//! -------
//! Provide the linear Gaussian state-space machinery behind the Cholette
//! engine: a closed set of model variants ([`model`]) and a Kalman
//! filter/fixed-interval smoother with exact diffuse initialization
//! ([`smoother`]).
//!
//! Conventions
//! -----------
//! - States are `nalgebra::Vector2<f64>`; series are `ndarray::Array1<f64>`
//!   with `NaN` marking missing pseudo-observations.
//! - Failures surface as [`crate::numerics::NumericalError`].

pub mod model;
pub mod smoother;

pub use self::model::{CholetteSsf, Dynamics, Measurement};
pub use self::smoother::{FilteredSeries, SmoothedStates, filter, smooth, smooth_filtered};
