//! alignment — match low-frequency constraints to high-frequency blocks.
//!
//! Purpose
//! -------
//! Decide which low-frequency periods constrain a given high-frequency
//! series, where their blocks start inside it, and how far each constraint
//! is from the current aggregate of the series. Both engines start from an
//! [`Alignment`].
//!
//! Key behaviors
//! -------------
//! - Cumulative rules (Sum, Average) use only low periods whose whole block
//!   lies inside the high-frequency series; positional rules (First, Last,
//!   UserDefined) use every low period whose selected period does.
//! - Average constraints and aggregates are multiplied by the ratio, so
//!   every cumulative comparison happens on the sum scale.
//! - The block offset is the index, in the high-frequency series, of the
//!   first period of the first aligned block. It can be negative for
//!   positional rules when that block starts before the series.
//!
//! Invariants & assumptions
//! ------------------------
//! - Missing values (`NaN`) propagate: a missing constraint or a missing
//!   value inside a block gives a missing residual for that low period.
use crate::benchmarking::{
    core::{
        aggregation::AggregationType,
        series::{TsData, div_ceil},
        units::{TsUnit, ratio_of},
    },
    errors::BenchResult,
};
use ndarray::{Array1, ArrayView1};

/// ConstraintAligner — stateless alignment of constraints under one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintAligner {
    aggregation: AggregationType,
}

impl ConstraintAligner {
    pub fn new(aggregation: AggregationType) -> Self {
        ConstraintAligner { aggregation }
    }

    pub fn aggregation(&self) -> AggregationType {
        self.aggregation
    }

    /// Align `low` on `high`.
    ///
    /// Parameters
    /// ----------
    /// - `high`: high-frequency series.
    /// - `low`: low-frequency constraints.
    ///
    /// Returns
    /// -------
    /// `BenchResult<Alignment>`
    ///   Aligned constraints, current aggregates and block offset. The
    ///   alignment is empty when no low period overlaps `high`.
    ///
    /// Errors
    /// ------
    /// - `BenchError::IncompatibleFrequency` unless the high unit is an exact
    ///   multiple (≥ 2) of the low unit.
    /// - `BenchError::InvalidPosition` for a user position outside the block.
    pub fn align(&self, high: &TsData, low: &TsData) -> BenchResult<Alignment> {
        let ratio = ratio_of(high.unit(), low.unit())?;
        self.aggregation.validate(ratio)?;
        let r = ratio as i64;

        let (lo, hi) = match self.aggregation.position(ratio) {
            None => (div_ceil(high.start(), r), high.end().div_euclid(r)),
            Some(p) => {
                let p = p as i64;
                (div_ceil(high.start() - p, r), (high.end() - 1 - p).div_euclid(r) + 1)
            }
        };
        let first = lo.max(low.start());
        let last = hi.min(low.end()).max(first);

        let scale = self.aggregation.scale(ratio);
        let constraints = Array1::from_iter((first..last).map(|k| low.get(k) * scale));
        let aggregates = Array1::from_iter((first..last).map(|k| {
            let block_start = k * r;
            match self.aggregation.position(ratio) {
                None => (0..r).map(|i| high.get(block_start + i)).sum::<f64>(),
                Some(p) => high.get(block_start + p as i64),
            }
        }));

        Ok(Alignment {
            ratio,
            aggregation: self.aggregation,
            low_start: first,
            block_offset: first * r - high.start(),
            constraints,
            aggregates,
        })
    }

    /// Alignment for interpolation: the high-frequency domain is the span of
    /// `low` at unit `high`, with nothing to aggregate yet.
    pub fn align_to_unit(&self, high: TsUnit, low: &TsData) -> BenchResult<Alignment> {
        let ratio = ratio_of(high, low.unit())?;
        self.aggregation.validate(ratio)?;
        let scale = self.aggregation.scale(ratio);
        Ok(Alignment {
            ratio,
            aggregation: self.aggregation,
            low_start: low.start(),
            block_offset: 0,
            constraints: low.values().mapv(|v| v * scale),
            aggregates: Array1::zeros(low.len()),
        })
    }
}

/// Alignment — constraints matched to blocks of a high-frequency series.
///
/// Fields
/// ------
/// - `ratio`: high periods per low period.
/// - `aggregation`: rule relating a block to its constraint.
/// - `low_start`: absolute id of the first aligned low period.
/// - `block_offset`: index in the high series of the first aligned block.
/// - `constraints`: aligned constraint values (sum scale for Average).
/// - `aggregates`: current aggregate of each block (same scale).
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    ratio: usize,
    aggregation: AggregationType,
    low_start: i64,
    block_offset: i64,
    constraints: Array1<f64>,
    aggregates: Array1<f64>,
}

impl Alignment {
    pub fn ratio(&self) -> usize {
        self.ratio
    }

    pub fn aggregation(&self) -> AggregationType {
        self.aggregation
    }

    /// Number of aligned low periods.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn low_start(&self) -> i64 {
        self.low_start
    }

    pub fn block_offset(&self) -> i64 {
        self.block_offset
    }

    /// Index in the high series of the period that determines the first
    /// constraint: the block end for cumulative rules, the selected period
    /// otherwise.
    pub fn offset(&self) -> i64 {
        self.block_offset + self.aggregation.observation_position(self.ratio) as i64
    }

    /// High-series index determining constraint `k`.
    pub fn observation_index(&self, k: usize) -> i64 {
        self.offset() + (k * self.ratio) as i64
    }

    pub fn constraints(&self) -> ArrayView1<'_, f64> {
        self.constraints.view()
    }

    pub fn aggregates(&self) -> ArrayView1<'_, f64> {
        self.aggregates.view()
    }

    /// Constraint minus current aggregate, per aligned low period.
    pub fn residuals(&self) -> Array1<f64> {
        &self.constraints - &self.aggregates
    }

    /// Number of aligned constraints that are not missing.
    pub fn count_observed(&self) -> usize {
        self.constraints.iter().zip(self.aggregates.iter()).filter(|(c, a)| !(c.is_nan() || a.is_nan())).count()
    }

    /// Spread per-period `values` over `n` high periods: `values[k]` lands at
    /// [`Self::observation_index`]`(k)`, every other position is missing.
    pub fn expand(&self, values: ArrayView1<'_, f64>, n: usize) -> Array1<f64> {
        let mut out = Array1::from_elem(n, f64::NAN);
        for (k, &v) in values.iter().enumerate() {
            let idx = self.observation_index(k);
            if idx >= 0 && (idx as usize) < n {
                out[idx as usize] = v;
            }
        }
        out
    }
}
