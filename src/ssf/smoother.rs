//! ssf::smoother — Kalman filter and fixed-interval state smoother.
//!
//! Purpose
//! -------
//! Compute, for every period of a [`CholetteSsf`], the minimum mean-square
//! error estimate of the state given *all* pseudo-observations. Most periods
//! are missing (one observation per low-frequency block), so the filter
//! simply skips the update there.
//!
//! Key behaviors
//! -------------
//! - [`filter`] runs the forward pass and keeps, per period, the predicted
//!   state and covariance plus the innovation, its variance and `Pₜ Zₜᵗ`.
//! - [`smooth_filtered`] runs the Durbin–Koopman backward recursion
//!   `rₜ₋₁ = Zₜᵗ vₜ / Fₜ + Lₜᵗ rₜ`, `α̂ₜ = aₜ + Pₜ rₜ₋₁`, with
//!   `Lₜ = Tₜ (I − Pₜ Zₜᵗ Zₜ / Fₜ)` and `rₜ₋₁ = Tₜᵗ rₜ` at missing periods.
//! - [`smooth`] adds exact diffuse handling for the random walk: the diffuse
//!   direction is propagated through the transitions, filtered as an extra
//!   data column sharing the gains of the data, and its generalized
//!   least-squares coefficient is estimated from both innovation sequences.
//!   The smoother is then run on the data net of that coefficient and the
//!   deterministic part is added back.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pseudo-observations are noiseless; smoothed states reproduce every
//!   observed value up to rounding.
//! - A missing observation is encoded as `NaN`.
//! - An observed period with zero innovation variance is skipped when its
//!   innovation is zero (redundant) and is an error otherwise.
//!
//! Performance
//! -----------
//! - One pass forward and one backward, `O(n)` time and memory with 2×2
//!   matrices; the diffuse case runs the forward pass three times.
use crate::{
    numerics::errors::{NumResult, NumericalError},
    ssf::model::CholetteSsf,
};
use nalgebra::{Matrix2, Vector2};
use ndarray::{Array1, ArrayView1};

/// Relative size under which an innovation variance is treated as zero.
pub const DEGENERATE_VARIANCE_TOL: f64 = 1e-13;

/// Relative size under which an innovation is treated as zero.
pub const REDUNDANT_INNOVATION_TOL: f64 = 1e-9;

/// Update quantities at an observed period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Innovation {
    /// `vₜ = yₜ − Zₜ aₜ`.
    pub v: f64,
    /// `Fₜ = Zₜ Pₜ Zₜᵗ`.
    pub f: f64,
    /// `Mₜ = Pₜ Zₜᵗ`.
    pub m: Vector2<f64>,
}

/// Predicted moments at one period, with the update if it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStep {
    pub a: Vector2<f64>,
    pub p: Matrix2<f64>,
    pub innovation: Option<Innovation>,
}

/// Output of the forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries {
    steps: Vec<FilterStep>,
}

impl FilteredSeries {
    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }
}

/// Smoothed states `α̂ₜ`, one per period.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedStates {
    states: Vec<Vector2<f64>>,
}

impl SmoothedStates {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, t: usize) -> &Vector2<f64> {
        &self.states[t]
    }

    /// Component `i` of every smoothed state.
    pub fn component(&self, i: usize) -> Array1<f64> {
        Array1::from_iter(self.states.iter().map(|s| s[i]))
    }
}

/// Forward Kalman filter over `data` (`NaN` = missing).
///
/// Errors
/// ------
/// - `NumericalError::LengthMismatch` when `data.len() != ssf.len()`.
/// - `NumericalError::DegenerateObservation` for an observed period whose
///   innovation variance vanishes while its innovation does not.
/// - `NumericalError::NonFiniteState` if a moment becomes NaN/±∞.
pub fn filter(ssf: &CholetteSsf, data: ArrayView1<'_, f64>) -> NumResult<FilteredSeries> {
    let n = ssf.len();
    if data.len() != n {
        return Err(NumericalError::LengthMismatch { expected: n, found: data.len() });
    }

    let (mut a, mut p) = ssf.initial_state();
    let q = ssf.innovation_variance();
    let mut steps = Vec::with_capacity(n);

    for (t, &y) in data.iter().enumerate() {
        let innovation = if y.is_nan() {
            None
        } else {
            let z = ssf.loading(t);
            let m = p * z.transpose();
            let f = (z * m)[(0, 0)];
            let v = y - (z * a)[(0, 0)];
            if f > DEGENERATE_VARIANCE_TOL * p.amax().max(1.0) {
                Some(Innovation { v, f, m })
            } else if v.abs() <= REDUNDANT_INNOVATION_TOL * (1.0 + y.abs()) {
                None
            } else {
                return Err(NumericalError::DegenerateObservation { t, variance: f, innovation: v });
            }
        };
        steps.push(FilterStep { a, p, innovation });

        let (au, pu) = match innovation {
            Some(Innovation { v, f, m }) => (a + m * (v / f), p - m * m.transpose() / f),
            None => (a, p),
        };
        let tt = ssf.transition(t);
        a = tt * au;
        p = tt * pu * tt.transpose() + q;
        p = (p + p.transpose()) * 0.5;

        if !a.iter().chain(p.iter()).all(|v| v.is_finite()) {
            return Err(NumericalError::NonFiniteState { t });
        }
    }

    Ok(FilteredSeries { steps })
}

/// Backward fixed-interval smoother over a completed forward pass.
pub fn smooth_filtered(ssf: &CholetteSsf, filtered: &FilteredSeries) -> NumResult<SmoothedStates> {
    let n = filtered.steps.len();
    let mut states = vec![Vector2::zeros(); n];
    let mut r = Vector2::<f64>::zeros();

    for t in (0..n).rev() {
        let step = &filtered.steps[t];
        let tr = ssf.transition(t).transpose() * r;
        r = match step.innovation {
            Some(Innovation { v, f, m }) => {
                let zt = ssf.loading(t).transpose();
                zt * (v / f) + tr - zt * (m.dot(&tr) / f)
            }
            None => tr,
        };
        let state = step.a + step.p * r;
        if !state.iter().all(|v| v.is_finite()) {
            return Err(NumericalError::NonFiniteState { t });
        }
        states[t] = state;
    }

    Ok(SmoothedStates { states })
}

/// Smoothed states of `ssf` given `data`, with exact diffuse initialization.
///
/// Parameters
/// ----------
/// - `ssf`: model to smooth.
/// - `data`: pseudo-observations of length `ssf.len()`, `NaN` = missing.
///
/// Returns
/// -------
/// `NumResult<SmoothedStates>`
///   States `α̂ₜ = E[αₜ | y]`. Without observations the states are zero.
///
/// Notes
/// -----
/// - For a diffuse model, write `αₜ = α̃ₜ + Aₜ δ` with `A₀` the diffuse
///   direction and `Aₜ₊₁ = Tₜ Aₜ`. The observations become
///   `yₜ = Zₜ α̃ₜ + xₜ δ` with `xₜ = Zₜ Aₜ`. Filtering `y` and `x` with the
///   same gains yields innovations `vₜ`, `eₜ` and
///   `δ̂ = Σ eₜ vₜ / Fₜ ÷ Σ eₜ² / Fₜ`; the result is the smoother of
///   `y − x δ̂` plus `Aₜ δ̂`.
pub fn smooth(ssf: &CholetteSsf, data: ArrayView1<'_, f64>) -> NumResult<SmoothedStates> {
    let Some(direction) = ssf.diffuse_direction() else {
        let filtered = filter(ssf, data)?;
        return smooth_filtered(ssf, &filtered);
    };

    let n = ssf.len();
    if data.len() != n {
        return Err(NumericalError::LengthMismatch { expected: n, found: data.len() });
    }

    let mut loads = Vec::with_capacity(n);
    let mut d = direction;
    for t in 0..n {
        loads.push(d);
        d = ssf.transition(t) * d;
    }
    let regressor = Array1::from_iter(
        (0..n).map(|t| if data[t].is_nan() { f64::NAN } else { (ssf.loading(t) * loads[t])[(0, 0)] }),
    );

    let fy = filter(ssf, data)?;
    let fx = filter(ssf, regressor.view())?;
    let (mut cross, mut info) = (0.0_f64, 0.0_f64);
    for (sy, sx) in fy.steps.iter().zip(fx.steps.iter()) {
        if let (Some(iy), Some(ix)) = (sy.innovation, sx.innovation) {
            cross += ix.v * iy.v / iy.f;
            info += ix.v * ix.v / ix.f;
        }
    }
    let delta = if info > 0.0 { cross / info } else { 0.0 };

    let adjusted = Array1::from_iter(data.iter().zip(regressor.iter()).map(|(&y, &x)| y - x * delta));
    let filtered = filter(ssf, adjusted.view())?;
    let mut smoothed = smooth_filtered(ssf, &filtered)?;
    for (state, load) in smoothed.states.iter_mut().zip(loads.iter()) {
        *state += load * delta;
    }
    Ok(smoothed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssf::model::{Dynamics, Measurement};
    use approx::assert_abs_diff_eq;
    use nalgebra::{DMatrix, DVector};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact reproduction of noiseless pseudo-observations by the smoother.
    // - Agreement with the equivalent constrained generalized least-squares
    //   problem (dense nalgebra KKT solve), for stationary and diffuse
    //   dynamics, cumulated and point measurements.
    // - Degenerate and empty observation sets.
    // -------------------------------------------------------------------------

    /// Dense reference: minimize the prior quadratic form of `b` subject to
    /// the measurement equations, via the KKT system.
    fn gls_reference(ssf: &CholetteSsf, data: &Array1<f64>) -> Vec<f64> {
        let n = ssf.len();
        let rho = ssf.dynamics().rho();
        let mut h = DMatrix::<f64>::zeros(n, n);
        if !ssf.dynamics().is_diffuse() {
            h[(0, 0)] += 1.0 - rho * rho;
        }
        for t in 1..n {
            h[(t, t)] += 1.0;
            h[(t - 1, t - 1)] += rho * rho;
            h[(t, t - 1)] -= rho;
            h[(t - 1, t)] -= rho;
        }
        let observed: Vec<usize> = (0..n).filter(|&t| !data[t].is_nan()).collect();
        let m = observed.len();
        let mut kkt = DMatrix::<f64>::zeros(n + m, n + m);
        kkt.view_mut((0, 0), (n, n)).copy_from(&h);
        let mut rhs = DVector::<f64>::zeros(n + m);
        for (k, &t) in observed.iter().enumerate() {
            let cols: Vec<usize> = match ssf.measurement() {
                Measurement::Point => vec![t],
                Measurement::Cumulated { .. } => {
                    let mut s = t;
                    while s > 0 && !ssf.starts_block(s) {
                        s -= 1;
                    }
                    (s..=t).collect()
                }
            };
            for c in cols {
                kkt[(n + k, c)] = ssf.weight(c);
                kkt[(c, n + k)] = ssf.weight(c);
            }
            rhs[n + k] = data[t];
        }
        let sol = kkt.lu().solve(&rhs).expect("reference KKT system should be regular");
        sol.iter().take(n).copied().collect()
    }

    fn sparse_block_sums(n: usize, phase: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|t| if (t + phase + 1) % 4 == 0 { t as f64 } else { f64::NAN }))
    }

    #[test]
    // Purpose
    // -------
    // With AR(1) dynamics and cumulated weighted measurements, the smoothed
    // bias must match the constrained GLS solution and reproduce each block
    // sum exactly.
    //
    // Given
    // -----
    // - n = 16, ratio = 4, phase = 2, ρ = 0.8, weights wₜ = t + 1.
    // - Observations at the last period of each block (t = 1, 5, 9, 13); the
    //   first block is truncated by the phase.
    //
    // Expect
    // ------
    // - |b̂ₜ − b_gls,ₜ| < 1e-9 for all t.
    // - Σ_block wₜ b̂ₜ equals the observation to 1e-9.
    fn stationary_cumulated_smoother_matches_constrained_gls() {
        // Arrange
        let n = 16;
        let w = Array1::from_iter((0..n).map(|t| t as f64 + 1.0));
        let ssf = CholetteSsf::new(
            n,
            Dynamics::Ar1 { rho: 0.8 },
            Measurement::Cumulated { ratio: 4, phase: 2 },
            Some(w.clone()),
        );
        let data = sparse_block_sums(n, 2);

        // Act
        let smoothed = smooth(&ssf, data.view()).unwrap();
        let reference = gls_reference(&ssf, &data);

        // Assert
        let b = smoothed.component(1);
        for t in 0..n {
            assert_abs_diff_eq!(b[t], reference[t], epsilon = 1e-9);
        }
        for last in [5usize, 9, 13] {
            let total: f64 = (last - 3..=last).map(|t| w[t] * b[t]).sum();
            assert_abs_diff_eq!(total, data[last], epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // The random walk has a diffuse initial level; the augmented treatment
    // must reproduce the GLS solution in which `b₀` is unpenalized.
    fn diffuse_cumulated_smoother_matches_constrained_gls() {
        // Arrange
        let n = 16;
        let w = Array1::from_iter((0..n).map(|t| 1.0 + 0.1 * t as f64));
        let ssf = CholetteSsf::new(
            n,
            Dynamics::RandomWalk,
            Measurement::Cumulated { ratio: 4, phase: 0 },
            Some(w),
        );
        let data = sparse_block_sums(n, 0);

        // Act
        let smoothed = smooth(&ssf, data.view()).unwrap();
        let reference = gls_reference(&ssf, &data);

        // Assert
        for (t, r) in reference.iter().enumerate() {
            assert_abs_diff_eq!(smoothed.state(t)[1], *r, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Point measurements with a random walk interpolate linearly between
    // observed periods and stay flat outside them.
    //
    // Given
    // -----
    // - Unit weights, observations b₃ = 1 and b₇ = 5.
    //
    // Expect
    // ------
    // - b̂ = [1, 1, 1, 1, 2, 3, 4, 5, 5, 5].
    fn diffuse_point_smoother_interpolates_linearly() {
        // Arrange
        let n = 10;
        let ssf = CholetteSsf::new(n, Dynamics::RandomWalk, Measurement::Point, None);
        let mut data = Array1::from_elem(n, f64::NAN);
        data[3] = 1.0;
        data[7] = 5.0;

        // Act
        let b = smooth(&ssf, data.view()).unwrap().component(1);

        // Assert
        let expected = [1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 5.0, 5.0];
        for (got, want) in b.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-9);
        }
    }

    #[test]
    fn stationary_point_smoother_decays_away_from_observation() {
        let n = 7;
        let ssf = CholetteSsf::new(n, Dynamics::Ar1 { rho: 0.5 }, Measurement::Point, None);
        let mut data = Array1::from_elem(n, f64::NAN);
        data[3] = 8.0;
        let b = smooth(&ssf, data.view()).unwrap().component(1);
        let expected = [1.0, 2.0, 4.0, 8.0, 4.0, 2.0, 1.0];
        for (got, want) in b.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Without any observation the smoother returns the prior mean.
    fn smoother_without_observations_returns_zero_states() {
        let ssf = CholetteSsf::new(
            5,
            Dynamics::RandomWalk,
            Measurement::Cumulated { ratio: 2, phase: 1 },
            None,
        );
        let data = Array1::from_elem(5, f64::NAN);
        let smoothed = smooth(&ssf, data.view()).unwrap();
        assert!(smoothed.component(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // A zero weight at an observed point makes the observation
    // uninformative; a non-zero target there cannot be met.
    fn zero_weight_observation_is_degenerate() {
        // Arrange
        let w = Array1::from(vec![1.0, 0.0, 1.0]);
        let ssf = CholetteSsf::new(3, Dynamics::Ar1 { rho: 0.9 }, Measurement::Point, Some(w));
        let data = Array1::from(vec![f64::NAN, 2.0, f64::NAN]);

        // Act
        let err = smooth(&ssf, data.view()).unwrap_err();

        // Assert
        assert!(matches!(err, NumericalError::DegenerateObservation { t: 1, .. }), "got {err:?}");
    }

    #[test]
    fn filter_rejects_length_mismatch() {
        let ssf = CholetteSsf::new(4, Dynamics::RandomWalk, Measurement::Point, None);
        let err = filter(&ssf, Array1::<f64>::zeros(3).view()).unwrap_err();
        assert_eq!(err, NumericalError::LengthMismatch { expected: 4, found: 3 });
    }
}
