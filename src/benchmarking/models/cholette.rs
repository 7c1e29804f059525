//! Cholette benchmarking: state-space smoothing of the discrepancy between a
//! series and its constraints.
//!
//! Purpose
//! -------
//! Treat the (weighted) gap between a high-frequency series and its
//! low-frequency targets as an AR(1) or random-walk bias, observe that bias
//! only through the per-period residuals, and add its smoothed estimate to
//! the series.
//!
//! Key behaviors
//! -------------
//! - Optional bias pre-correction, additive or multiplicative, estimated over
//!   the low periods where both the constraint and the aggregate exist.
//! - Magnitude normalization by the mean absolute value, inverted at the end.
//! - Residuals are placed at one period per low period (block end for Sum /
//!   Average, the selected period otherwise); everything else is missing.
//! - Sum / Average use the cumulated measurement of
//!   [`crate::ssf::model::Measurement::Cumulated`]; positional rules use a
//!   point measurement. Weights are `|x|^λ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The high-frequency series passed in has no leading or trailing missing
//!   values; interior missing values stay missing in the output and make the
//!   constraint of their low period missing.
use crate::{
    benchmarking::{
        core::{
            alignment::{Alignment, ConstraintAligner},
            options::{BiasCorrection, CholetteSpec},
            series::TsData,
            validation::validate_no_infinite,
        },
        errors::{BenchError, BenchResult},
    },
    ssf::{
        model::{CholetteSsf, Dynamics, Measurement},
        smoother::smooth,
    },
};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

/// CholetteEngine — smoother-based benchmarking for one [`CholetteSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CholetteEngine {
    spec: CholetteSpec,
}

impl CholetteEngine {
    /// Engine for a validated spec.
    ///
    /// Errors
    /// ------
    /// - `BenchError::InvalidRho` / `InvalidLambda` for out-of-range values.
    pub fn new(spec: CholetteSpec) -> BenchResult<Self> {
        spec.validate()?;
        Ok(CholetteEngine { spec })
    }

    pub fn spec(&self) -> &CholetteSpec {
        &self.spec
    }

    /// Benchmark `high` to `low`.
    ///
    /// Parameters
    /// ----------
    /// - `high`: high-frequency series, trimmed of outer missing values.
    /// - `low`: low-frequency constraints.
    ///
    /// Returns
    /// -------
    /// `BenchResult<Array1<f64>>`
    ///   Values of the benchmarked series over the domain of `high`. When no
    ///   constraint can be used, the bias-corrected input is returned.
    ///
    /// Errors
    /// ------
    /// - `BenchError::IncompatibleFrequency` / `InvalidPosition` from the
    ///   alignment.
    /// - `BenchError::NonFiniteData` for ±∞ inputs.
    /// - `BenchError::UndefinedBias` for a multiplicative correction with a
    ///   zero aggregate.
    /// - `BenchError::Numerical` if smoothing fails.
    pub fn benchmark(&self, high: &TsData, low: &TsData) -> BenchResult<Array1<f64>> {
        if high.is_empty() {
            return Err(BenchError::EmptySeries);
        }
        validate_no_infinite(high.values())?;
        validate_no_infinite(low.values())?;

        let aligner = ConstraintAligner::new(self.spec.aggregation);
        let initial = aligner.align(high, low)?;
        let corrected = self.correct_bias(high.values(), &initial)?;

        let factor = normalization_factor(corrected.view());
        let x = corrected.mapv(|v| v * factor);
        let scaled_high = TsData::new(high.unit(), high.start(), x.clone());
        let scaled_low = TsData::new(low.unit(), low.start(), low.values().mapv(|v| v * factor));
        let alignment = aligner.align(&scaled_high, &scaled_low)?;

        let observed = alignment.count_observed();
        debug!(
            n = x.len(),
            ratio = alignment.ratio(),
            offset = alignment.offset(),
            constraints = observed,
            "cholette benchmarking"
        );
        if observed == 0 {
            warn!(n = x.len(), "no constraint overlaps the series; returning it unchanged");
            return Ok(corrected);
        }

        let correction = self.correction(x.view(), high.start(), &alignment)?;
        Ok((x + correction) / factor)
    }

    /// Series after the configured bias pre-correction.
    ///
    /// Only low periods where both the constraint and the aggregate are
    /// known contribute. Without such a period the series is returned as is.
    ///
    /// The additive shift is `(Σc − Σa) / count` over those periods, so a
    /// target outside the span of `x` never moves it.
    pub fn correct_bias(&self, x: ArrayView1<'_, f64>, alignment: &Alignment) -> BenchResult<Array1<f64>> {
        let scale = alignment.aggregation().scale(alignment.ratio());
        let (mut target, mut current, mut count) = (0.0_f64, 0.0_f64, 0usize);
        for (&c, &a) in alignment.constraints().iter().zip(alignment.aggregates().iter()) {
            if !(c.is_nan() || a.is_nan()) {
                target += c / scale;
                current += a / scale;
                count += 1;
            }
        }
        if count == 0 {
            return Ok(x.to_owned());
        }

        match self.spec.bias {
            BiasCorrection::None => Ok(x.to_owned()),
            BiasCorrection::Additive => {
                // Mean gap per overlapping low period, not per target.
                let b = (target - current) / count as f64;
                Ok(x.mapv(|v| v + b))
            }
            BiasCorrection::Multiplicative => {
                if current == 0.0 {
                    return Err(BenchError::UndefinedBias {
                        what: "Multiplicative",
                        reason: "the aggregated series sums to zero",
                    });
                }
                let b = target / current;
                Ok(x.mapv(|v| v * b))
            }
        }
    }

    /// Weights `|x|^λ`, zero at missing periods; `None` when `λ = 0`.
    pub fn weights(&self, x: ArrayView1<'_, f64>) -> Option<Array1<f64>> {
        let lambda = self.spec.lambda;
        if lambda == 0.0 {
            return None;
        }
        Some(x.mapv(|v| {
            if v.is_nan() {
                0.0
            } else if lambda == 1.0 {
                v.abs()
            } else {
                v.abs().powf(lambda)
            }
        }))
    }

    /// Smoothed additive correction for the normalized series `x`.
    fn correction(&self, x: ArrayView1<'_, f64>, start: i64, alignment: &Alignment) -> BenchResult<Array1<f64>> {
        let n = x.len();
        let ratio = alignment.ratio();
        let data = alignment.expand(alignment.residuals().view(), n);

        let measurement = if self.spec.aggregation.is_cumulative() {
            Measurement::Cumulated { ratio, phase: start.rem_euclid(ratio as i64) as usize }
        } else {
            Measurement::Point
        };
        let ssf = CholetteSsf::new(n, Dynamics::from_rho(self.spec.rho), measurement, self.weights(x));
        let states = smooth(&ssf, data.view())?;
        Ok(Array1::from_iter((0..n).map(|t| ssf.correction(t, states.state(t)))))
    }
}

/// `1 / mean|x|` over non-missing values, 1 when that mean is zero.
fn normalization_factor(x: ArrayView1<'_, f64>) -> f64 {
    let (sum, count) = x.iter().filter(|v| !v.is_nan()).fold((0.0_f64, 0usize), |(s, c), v| (s + v.abs(), c + 1));
    if count == 0 || sum == 0.0 { 1.0 } else { count as f64 / sum }
}
