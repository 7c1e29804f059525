//! Differencing polynomials and operators.
//!
//! The order-`d` unit-root difference polynomial is `(1 − B)^d`; its
//! coefficients are the signed binomial coefficients
//! `c[k] = (−1)^k · C(d, k)` for `k = 0..=d`. The Denton movement penalty is
//! built from these coefficients, either as a banded `(n − d) × n` operator
//! (every row a full difference) or as a square `n × n` operator whose first
//! `d` rows are truncated differences anchored on the initial levels.
//!
//! Operators are returned in row-sparse form ([`DiffOperator`]) since every
//! row has at most `d + 1` non-zero entries and the solver only ever needs
//! `DᵗD` and `Dᵗ D x`.
use ndarray::{Array1, ArrayView1};

/// Coefficients of `(1 − B)^d`, lowest power first.
///
/// Built by repeated multiplication with `(1 − B)` so that no factorial is
/// evaluated; the result is exact in `f64` for every order used in practice.
///
/// ```rust
/// # use rust_benchmarking::numerics::differencing::difference_coefficients;
/// assert_eq!(difference_coefficients(2).to_vec(), vec![1.0, -2.0, 1.0]);
/// ```
pub fn difference_coefficients(order: usize) -> Array1<f64> {
    let mut coeffs = vec![1.0_f64];
    for _ in 0..order {
        let mut next = vec![0.0_f64; coeffs.len() + 1];
        for (k, &c) in coeffs.iter().enumerate() {
            next[k] += c;
            next[k + 1] -= c;
        }
        coeffs = next;
    }
    Array1::from(coeffs)
}

/// DiffOperator — row-sparse differencing matrix `D`.
///
/// Each row stores `(column, value)` pairs in increasing column order.
/// Column scaling (used by the multiplicative Denton variant, where column
/// `c` is multiplied by `1 / x[c]`) is applied at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOperator {
    ncols: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

impl DiffOperator {
    /// Banded `(n − d) × n` operator: row `r` is the full difference
    /// `Σᵢ c[d − i] · s[r + i] · z[r + i]`, `i = 0..=d`.
    ///
    /// `scale` multiplies column `c` by `scale[c]`; `None` means unit scaling.
    /// Returns an operator with zero rows when `n ≤ d`.
    pub fn modified(n: usize, order: usize, scale: Option<ArrayView1<'_, f64>>) -> Self {
        let coeffs = difference_coefficients(order);
        let nrows = n.saturating_sub(order);
        let rows = (0..nrows)
            .map(|r| {
                (0..=order)
                    .map(|i| {
                        let col = r + i;
                        let s = scale.as_ref().map_or(1.0, |s| s[col]);
                        (col, coeffs[order - i] * s)
                    })
                    .collect()
            })
            .collect();
        DiffOperator { ncols: n, rows }
    }

    /// Square `n × n` operator: row `r` is `Σᵢ c[i] · s[r − i] · z[r − i]`
    /// over `i = 0..=min(d, r)`, so the first rows penalize the levels and
    /// partial differences of the initial values.
    pub fn full(n: usize, order: usize, scale: Option<ArrayView1<'_, f64>>) -> Self {
        let coeffs = difference_coefficients(order);
        let rows = (0..n)
            .map(|r| {
                (0..=order.min(r))
                    .rev()
                    .map(|i| {
                        let col = r - i;
                        let s = scale.as_ref().map_or(1.0, |s| s[col]);
                        (col, coeffs[i] * s)
                    })
                    .collect()
            })
            .collect();
        DiffOperator { ncols: n, rows }
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Non-zero entries of row `r`, increasing column order.
    pub fn row(&self, r: usize) -> &[(usize, f64)] {
        &self.rows[r]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, f64)]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// `D z`.
    pub fn apply(&self, z: ArrayView1<'_, f64>) -> Array1<f64> {
        Array1::from_iter(self.rows.iter().map(|row| row.iter().map(|&(c, v)| v * z[c]).sum()))
    }

    /// `Dᵗ D z`, computed row by row without forming `DᵗD`.
    pub fn normal_apply(&self, z: ArrayView1<'_, f64>) -> Array1<f64> {
        let dz = self.apply(z);
        let mut out = Array1::<f64>::zeros(self.ncols);
        for (row, &value) in self.rows.iter().zip(dz.iter()) {
            for &(c, v) in row {
                out[c] += v * value;
            }
        }
        out
    }
}
