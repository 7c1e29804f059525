//! Benchmarking options — configuration of the Denton and Cholette engines.
//!
//! Purpose
//! -------
//! Collect the knobs of each benchmarking method in a plain, serializable
//! struct that is built once and passed by reference to a processor.
//!
//! Key behaviors
//! -------------
//! - [`DentonSpec`] selects the differencing order, additive vs
//!   multiplicative (proportional) penalty, banded vs square differencing
//!   operator, and the aggregation rule.
//! - [`CholetteSpec`] selects the bias dynamics `ρ`, the weighting exponent
//!   `λ`, an optional bias pre-correction and the aggregation rule.
//! - Both derive `serde` traits with `#[serde(default)]`, so configuration
//!   files need only name the fields they change.
//!
//! Invariants & assumptions
//! ------------------------
//! - `new` constructors validate their parameters. Specs built field by
//!   field or deserialized are checked again by [`DentonSpec::validate`] /
//!   [`CholetteSpec::validate`] when a processor runs.
//! - The user-defined observation position travels inside
//!   [`AggregationType::UserDefined`]; it is checked against the frequency
//!   ratio only once the series are known.
use crate::benchmarking::{
    core::{
        aggregation::AggregationType,
        validation::{validate_differencing, validate_lambda, validate_rho},
    },
    errors::{BenchError, BenchResult},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// DentonSpec — movement-preservation benchmarking.
///
/// Fields
/// ------
/// - `differencing`: order `d ≥ 1` of the differences being penalized.
/// - `multiplicative`: penalize differences of ratios to the input
///   (proportional Denton) instead of differences of levels.
/// - `modified`: use the banded `(n − d) × n` differencing operator, leaving
///   the initial level free; `false` uses the square operator anchored on
///   the initial values.
/// - `aggregation`: rule relating the output to the constraints.
///
/// Notes
/// -----
/// - Default: `d = 1`, multiplicative, modified, `Sum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DentonSpec {
    pub differencing: usize,
    pub multiplicative: bool,
    pub modified: bool,
    pub aggregation: AggregationType,
}

impl Default for DentonSpec {
    fn default() -> Self {
        DentonSpec {
            differencing: 1,
            multiplicative: true,
            modified: true,
            aggregation: AggregationType::Sum,
        }
    }
}

impl DentonSpec {
    /// Validated Denton configuration.
    ///
    /// Errors
    /// ------
    /// - `BenchError::InvalidDifferencing` if `differencing == 0`.
    pub fn new(
        differencing: usize, multiplicative: bool, modified: bool, aggregation: AggregationType,
    ) -> BenchResult<Self> {
        let spec = DentonSpec { differencing, multiplicative, modified, aggregation };
        spec.validate()?;
        Ok(spec)
    }

    /// Re-check a spec built field by field or loaded from configuration.
    pub fn validate(&self) -> BenchResult<()> {
        validate_differencing(self.differencing)?;
        Ok(())
    }
}

/// Optional pre-correction of a systematic level difference between the
/// series and its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BiasCorrection {
    #[default]
    None,
    Additive,
    Multiplicative,
}

impl fmt::Display for BiasCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BiasCorrection::None => "None",
            BiasCorrection::Additive => "Additive",
            BiasCorrection::Multiplicative => "Multiplicative",
        };
        f.write_str(name)
    }
}

impl FromStr for BiasCorrection {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BiasCorrection::None),
            "additive" => Ok(BiasCorrection::Additive),
            "multiplicative" => Ok(BiasCorrection::Multiplicative),
            _ => Err(BenchError::UnknownOption { what: "bias correction", name: s.to_string() }),
        }
    }
}

/// CholetteSpec — state-space benchmarking.
///
/// Fields
/// ------
/// - `rho`: AR(1) coefficient of the bias, `0 < ρ ≤ 1`; `ρ = 1` is a random
///   walk.
/// - `lambda`: weights are `|x|^λ`; `λ = 0` gives equal weights.
/// - `bias`: optional pre-correction applied before smoothing.
/// - `aggregation`: rule relating the output to the constraints.
///
/// Notes
/// -----
/// - Default: `ρ = 1`, `λ = 1`, no bias correction, `Sum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CholetteSpec {
    pub rho: f64,
    pub lambda: f64,
    pub bias: BiasCorrection,
    pub aggregation: AggregationType,
}

impl Default for CholetteSpec {
    fn default() -> Self {
        CholetteSpec {
            rho: 1.0,
            lambda: 1.0,
            bias: BiasCorrection::None,
            aggregation: AggregationType::Sum,
        }
    }
}

impl CholetteSpec {
    /// Validated Cholette configuration.
    ///
    /// Errors
    /// ------
    /// - `BenchError::InvalidRho` unless `0 < rho ≤ 1`.
    /// - `BenchError::InvalidLambda` unless `lambda` is finite and `≥ 0`.
    pub fn new(
        rho: f64, lambda: f64, bias: BiasCorrection, aggregation: AggregationType,
    ) -> BenchResult<Self> {
        let spec = CholetteSpec { rho, lambda, bias, aggregation };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> BenchResult<()> {
        validate_rho(self.rho)?;
        validate_lambda(self.lambda)?;
        Ok(())
    }
}
