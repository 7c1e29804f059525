//! core — series model, aggregation rules, alignment and options shared by
//! the benchmarking engines.
//!
//! Purpose
//! -------
//! Hold everything both engines need before any matrix or state-space model
//! is built: units and frequency ratios, the series container, aggregation
//! rules, constraint alignment, method options and input validation.
//!
//! Key behaviors
//! -------------
//! - [`TsUnit`] / [`ratio_of`] decide whether two frequencies are compatible.
//! - [`TsData`] carries values with an absolute start period.
//! - [`ConstraintAligner`] turns a (high, low) pair into an [`Alignment`]:
//!   aligned constraints, current aggregates and offsets.
//! - [`DentonSpec`] / [`CholetteSpec`] configure the engines.
//!
//! Conventions
//! -----------
//! - Missing values are `NaN` throughout.
//! - Period ids are absolute (`year · periods_per_year + position`).

pub mod aggregation;
pub mod alignment;
pub mod options;
pub mod series;
pub mod units;
pub mod validation;

pub use self::aggregation::AggregationType;
pub use self::alignment::{Alignment, ConstraintAligner};
pub use self::options::{BiasCorrection, CholetteSpec, DentonSpec};
pub use self::series::TsData;
pub use self::units::{TsUnit, ratio_of};
