//! Denton benchmarking: movement preservation under exact aggregation
//! constraints.
//!
//! The engine minimizes `‖D (w − x)‖²`-type penalties, where `D` is the
//! order-`d` differencing operator (column-scaled by `1 / x` in the
//! multiplicative variant), subject to `J w = y`. The stationarity conditions
//! form the augmented system
//!
//! ```text
//! [ DᵗD  Jᵗ ] [ w ]   [ DᵗD x ]
//! [ J    0  ] [ λ ] = [ y     ]
//! ```
//!
//! which is assembled directly in an interleaved unknown ordering: every
//! multiplier is placed right after the last period its constraint touches.
//! That ordering keeps the matrix banded with half-bandwidth `O(ratio + d)`,
//! and the banded LU of [`crate::numerics::banded`] solves it in linear time.
//! The same solver serves reconciliation and interpolation.
//!
//! The reference series is divided by its mean before assembly and the
//! solution multiplied back, so the system is independent of the level of
//! the data.
use crate::{
    benchmarking::{
        core::{
            alignment::Alignment,
            options::DentonSpec,
            validation::{validate_length, validate_no_infinite, validate_no_missing, validate_nonzero},
        },
        errors::{BenchError, BenchResult},
    },
    numerics::{banded::BandMatrix, differencing::DiffOperator},
};
use ndarray::{Array1, ArrayView1};
use std::ops::Range;
use tracing::{trace, warn};

/// DentonEngine — solver for one [`DentonSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DentonEngine {
    spec: DentonSpec,
}

/// One aggregation equation: the output over `cols` must equal `value`.
#[derive(Debug, Clone, PartialEq)]
struct Constraint {
    cols: Range<usize>,
    value: f64,
}

impl DentonEngine {
    /// Engine for a validated spec.
    ///
    /// Errors
    /// ------
    /// - `BenchError::InvalidDifferencing` if the differencing order is 0.
    pub fn new(spec: DentonSpec) -> BenchResult<Self> {
        spec.validate()?;
        Ok(DentonEngine { spec })
    }

    pub fn spec(&self) -> &DentonSpec {
        &self.spec
    }

    /// Reconcile `high` with the constraints of `alignment` when `high` is
    /// given, interpolate from the constraints alone otherwise.
    pub fn process(&self, high: Option<ArrayView1<'_, f64>>, alignment: &Alignment) -> BenchResult<Array1<f64>> {
        match high {
            Some(x) => self.reconcile(x, alignment),
            None => self.interpolate(alignment),
        }
    }

    /// Benchmark the reference series `high` to the aligned constraints.
    ///
    /// Parameters
    /// ----------
    /// - `high`: reference series, no missing values. The movement penalty
    ///   compares every period with its neighbours, so a missing reference
    ///   value leaves the objective undefined; callers trim outer gaps and
    ///   interior gaps are rejected.
    /// - `alignment`: constraints aligned on `high` under the engine's
    ///   aggregation rule (see
    ///   [`crate::benchmarking::core::ConstraintAligner::align`]).
    ///
    /// Returns
    /// -------
    /// `BenchResult<Array1<f64>>`
    ///   Series of the same length as `high` that meets every non-missing
    ///   constraint. Without any usable constraint, `high` is returned as is.
    ///
    /// Errors
    /// ------
    /// - `BenchError::AggregationMismatch` if `alignment` was built for
    ///   another aggregation rule.
    /// - `BenchError::InteriorMissing` / `NonFiniteData` for unusable values.
    /// - `BenchError::ZeroReference` for a zero value in multiplicative mode.
    /// - `BenchError::SeriesTooShort` if the banded operator has no row.
    /// - `BenchError::Numerical` if the augmented system is singular.
    pub fn reconcile(&self, high: ArrayView1<'_, f64>, alignment: &Alignment) -> BenchResult<Array1<f64>> {
        self.check_alignment(alignment)?;
        let n = high.len();
        let d = self.spec.differencing;
        validate_length(n, d, self.spec.modified)?;
        validate_no_infinite(high)?;
        validate_no_missing(high, 0)?;
        if self.spec.multiplicative {
            validate_nonzero(high, 0)?;
        }

        let constraints = self.constraints(alignment, n);
        if constraints.is_empty() {
            warn!(n, "no constraint overlaps the series; returning it unchanged");
            return Ok(high.to_owned());
        }

        let mean = high.sum() / n as f64;
        let xm = if mean == 0.0 { 1.0 } else { mean };
        let x = high.mapv(|v| v / xm);
        let inverse = self.spec.multiplicative.then(|| x.mapv(|v| 1.0 / v));
        let op = self.operator(n, inverse.as_ref().map(|s| s.view()));
        let top = op.normal_apply(x.view());

        let w = solve_augmented(&op, &top, &constraints, 1.0 / xm)?;
        Ok(w * xm)
    }

    /// Build a high-frequency series from the constraints alone.
    ///
    /// The output covers `alignment.len() · ratio` periods, starting with the
    /// first aligned low period. The reference is a constant profile, so with
    /// `d = 1` a flat block reproduces each constraint.
    ///
    /// Errors
    /// ------
    /// - `BenchError::AggregationMismatch` if `alignment` was built for
    ///   another aggregation rule.
    /// - `BenchError::EmptySeries` without constraints.
    /// - `BenchError::SeriesTooShort` if the banded operator has no row.
    /// - `BenchError::Numerical` if the augmented system is singular.
    pub fn interpolate(&self, alignment: &Alignment) -> BenchResult<Array1<f64>> {
        self.check_alignment(alignment)?;
        let n = alignment.len() * alignment.ratio();
        validate_length(n, self.spec.differencing, self.spec.modified)?;
        validate_no_infinite(alignment.constraints())?;

        let constraints = self.constraints(alignment, n);
        if constraints.is_empty() {
            return Err(BenchError::EmptySeries);
        }
        let op = self.operator(n, None);
        let top = Array1::zeros(n);
        solve_augmented(&op, &top, &constraints, 1.0)
    }

    /// Constraint values are scaled by the alignment's rule and placed by the
    /// engine's; both must agree.
    fn check_alignment(&self, alignment: &Alignment) -> BenchResult<()> {
        if alignment.aggregation() != self.spec.aggregation {
            return Err(BenchError::AggregationMismatch {
                expected: self.spec.aggregation,
                found: alignment.aggregation(),
            });
        }
        Ok(())
    }

    fn operator(&self, n: usize, scale: Option<ArrayView1<'_, f64>>) -> DiffOperator {
        if self.spec.modified {
            DiffOperator::modified(n, self.spec.differencing, scale)
        } else {
            DiffOperator::full(n, self.spec.differencing, scale)
        }
    }

    /// Non-missing aligned constraints as column ranges of the output.
    fn constraints(&self, alignment: &Alignment, n: usize) -> Vec<Constraint> {
        let ratio = alignment.ratio();
        let position = self.spec.aggregation.position(ratio);
        alignment
            .constraints()
            .iter()
            .enumerate()
            .filter(|(_, y)| !y.is_nan())
            .filter_map(|(k, &value)| {
                let start = alignment.block_offset() + (k * ratio) as i64;
                let (lo, hi) = match position {
                    None => (start, start + ratio as i64),
                    Some(p) => (start + p as i64, start + p as i64 + 1),
                };
                (lo >= 0 && hi <= n as i64).then(|| Constraint { cols: lo as usize..hi as usize, value })
            })
            .collect()
    }
}

/// Solve the augmented system for the output, in interleaved order.
///
/// `top` is the right-hand side of the penalty block; constraint values are
/// multiplied by `rhs_scale`.
fn solve_augmented(
    op: &DiffOperator, top: &Array1<f64>, constraints: &[Constraint], rhs_scale: f64,
) -> BenchResult<Array1<f64>> {
    let n = op.ncols();
    let m = constraints.len();

    let mut w_pos = vec![0usize; n];
    let mut l_pos = vec![0usize; m];
    let mut next = 0usize;
    let mut k = 0usize;
    for (c, slot) in w_pos.iter_mut().enumerate() {
        *slot = next;
        next += 1;
        while k < m && constraints[k].cols.end == c + 1 {
            l_pos[k] = next;
            next += 1;
            k += 1;
        }
    }

    let mut bandwidth = 0usize;
    for row in op.rows() {
        if let (Some(first), Some(last)) = (row.first(), row.last()) {
            bandwidth = bandwidth.max(w_pos[last.0] - w_pos[first.0]);
        }
    }
    for (con, &pos) in constraints.iter().zip(l_pos.iter()) {
        bandwidth = bandwidth.max(pos - w_pos[con.cols.start]);
    }

    let order = n + m;
    trace!(n, constraints = m, order, bandwidth, "assembling denton system");

    let mut a = BandMatrix::zeros(order, bandwidth, bandwidth);
    for row in op.rows() {
        for &(i, vi) in row {
            for &(j, vj) in row {
                a.add(w_pos[i], w_pos[j], vi * vj);
            }
        }
    }
    let mut rhs = Array1::<f64>::zeros(order);
    for (c, &pos) in w_pos.iter().enumerate() {
        rhs[pos] = top[c];
    }
    for (con, &pos) in constraints.iter().zip(l_pos.iter()) {
        for c in con.cols.clone() {
            a.add(pos, w_pos[c], 1.0);
            a.add(w_pos[c], pos, 1.0);
        }
        rhs[pos] = con.value * rhs_scale;
    }

    let solution = a.solve(rhs.view())?;
    Ok(Array1::from_iter(w_pos.iter().map(|&p| solution[p])))
}
