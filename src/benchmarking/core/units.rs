//! Series frequencies and the ratio between them.
//!
//! - [`TsUnit`] declares how many periods make up a year.
//! - [`ratio_of`] turns a (high, low) pair into the integer number of high
//!   periods per low period, or an incompatible-frequency error.
use crate::benchmarking::errors::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};

/// Annual frequency of a series, as periods per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TsUnit {
    periods_per_year: usize,
}

impl TsUnit {
    pub const YEARLY: TsUnit = TsUnit { periods_per_year: 1 };
    pub const HALF_YEARLY: TsUnit = TsUnit { periods_per_year: 2 };
    pub const QUARTERLY: TsUnit = TsUnit { periods_per_year: 4 };
    pub const MONTHLY: TsUnit = TsUnit { periods_per_year: 12 };

    /// Unit with `periods_per_year ≥ 1` periods in a year.
    pub fn new(periods_per_year: usize) -> BenchResult<Self> {
        if periods_per_year == 0 {
            return Err(BenchError::InvalidUnit);
        }
        Ok(TsUnit { periods_per_year })
    }

    pub fn periods_per_year(&self) -> usize {
        self.periods_per_year
    }
}

/// Number of `high` periods in one `low` period.
///
/// Errors
/// ------
/// - `BenchError::IncompatibleFrequency` unless `high` is an exact multiple
///   of `low` with a ratio of at least 2.
pub fn ratio_of(high: TsUnit, low: TsUnit) -> BenchResult<usize> {
    let (h, l) = (high.periods_per_year, low.periods_per_year);
    if l == 0 || h % l != 0 || h / l < 2 {
        return Err(BenchError::IncompatibleFrequency { high: h, low: l });
    }
    Ok(h / l)
}
