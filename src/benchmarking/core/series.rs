//! series — frequency-tagged numeric series with missing values.
//!
//! Purpose
//! -------
//! Hold the minimal time-series information the benchmarking engines
//! consume: a unit, the absolute id of the first period, and the values.
//!
//! Key behaviors
//! -------------
//! - Period ids are absolute: `id = year · periods_per_year + position`, so
//!   low period `k` of a unit `r` times coarser starts at high period
//!   `k · r`.
//! - [`TsData::clean_extremities`] drops leading/trailing missing values and
//!   [`TsData::extend`] puts a result back onto a wider domain.
//! - [`TsData::aggregate`] converts to a lower frequency under an
//!   [`AggregationType`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Missing values are `NaN`; ±∞ are not valid observations.
use crate::benchmarking::{
    core::{
        aggregation::AggregationType,
        units::{TsUnit, ratio_of},
    },
    errors::BenchResult,
};
use ndarray::{Array1, ArrayView1, s};

/// Smallest integer `≥ a / b` for `b > 0`.
pub(crate) fn div_ceil(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

/// TsData — values observed at consecutive periods of one unit.
///
/// Fields
/// ------
/// - `unit`: frequency of the series.
/// - `start`: absolute id of the first period.
/// - `values`: observations, `NaN` = missing.
#[derive(Debug, Clone, PartialEq)]
pub struct TsData {
    unit: TsUnit,
    start: i64,
    values: Array1<f64>,
}

impl TsData {
    pub fn new(unit: TsUnit, start: i64, values: Array1<f64>) -> Self {
        TsData { unit, start, values }
    }

    /// Series starting at `position` (0-based) of `year`.
    pub fn from_year(unit: TsUnit, year: i64, position: usize, values: &[f64]) -> Self {
        let start = year * unit.periods_per_year() as i64 + position as i64;
        TsData { unit, start, values: Array1::from(values.to_vec()) }
    }

    pub fn unit(&self) -> TsUnit {
        self.unit
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Id one past the last period.
    pub fn end(&self) -> i64 {
        self.start + self.values.len() as i64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Value at absolute period `id`, `NaN` outside the series.
    pub fn get(&self, id: i64) -> f64 {
        if id < self.start || id >= self.end() {
            f64::NAN
        } else {
            self.values[(id - self.start) as usize]
        }
    }

    /// Drop leading and trailing missing values.
    ///
    /// Returns the trimmed series and the number of leading values dropped;
    /// a fully missing series trims to an empty one.
    pub fn clean_extremities(&self) -> (TsData, usize) {
        let first = self.values.iter().position(|v| !v.is_nan());
        let last = self.values.iter().rposition(|v| !v.is_nan());
        match (first, last) {
            (Some(first), Some(last)) => {
                let values = self.values.slice(s![first..=last]).to_owned();
                (TsData { unit: self.unit, start: self.start + first as i64, values }, first)
            }
            _ => (TsData { unit: self.unit, start: self.start, values: Array1::zeros(0) }, self.len()),
        }
    }

    /// Copy onto the `len` periods starting at `start`, missing elsewhere.
    pub fn extend(&self, start: i64, len: usize) -> TsData {
        let values = Array1::from_iter((0..len as i64).map(|i| self.get(start + i)));
        TsData { unit: self.unit, start, values }
    }

    /// Aggregate to `low` under `aggregation`.
    ///
    /// Only low periods whose aggregated value is fully determined by the
    /// series are produced: complete blocks for cumulative rules, blocks
    /// whose selected period is covered for positional rules. Missing values
    /// propagate.
    ///
    /// Errors
    /// ------
    /// - `BenchError::IncompatibleFrequency` if `low` is not a coarser exact
    ///   divisor of the series unit.
    /// - `BenchError::InvalidPosition` for an out-of-block user position.
    pub fn aggregate(&self, low: TsUnit, aggregation: AggregationType) -> BenchResult<TsData> {
        let ratio = ratio_of(self.unit, low)?;
        aggregation.validate(ratio)?;
        let r = ratio as i64;
        let (first, last) = match aggregation.position(ratio) {
            None => (div_ceil(self.start, r), (self.end()).div_euclid(r) - 1),
            Some(p) => {
                let p = p as i64;
                (div_ceil(self.start - p, r), (self.end() - 1 - p).div_euclid(r))
            }
        };
        if last < first {
            return Ok(TsData { unit: low, start: first, values: Array1::zeros(0) });
        }
        let values = Array1::from_iter((first..=last).map(|k| {
            let block: Vec<f64> = (0..r).map(|i| self.get(k * r + i)).collect();
            aggregation.apply(&block)
        }));
        Ok(TsData { unit: low, start: first, values })
    }
}
