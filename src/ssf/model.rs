//! ssf::model — the Cholette state-space form as a closed set of variants.
//!
//! Purpose
//! -------
//! Describe the state-space model behind Cholette benchmarking with plain
//! tagged values instead of an open hierarchy of loadings and components:
//! the dynamics of the bias term are one of [`Dynamics::RandomWalk`] or
//! [`Dynamics::Ar1`], and the way the (weighted) bias enters the
//! pseudo-observations is one of [`Measurement::Cumulated`] or
//! [`Measurement::Point`]. A single filter/smoother in
//! [`crate::ssf::smoother`] consumes any combination.
//!
//! Key behaviors
//! -------------
//! - The state is `αₜ = (Cₜ, bₜ)`, where `bₜ` is the unweighted bias and `Cₜ`
//!   accumulates `w_s · b_s` over the earlier periods of the current
//!   low-frequency block (always zero for point measurements).
//! - Transition `t → t + 1`:
//!   `bₜ₊₁ = ρ · bₜ + εₜ` (ρ = 1 for the random walk, `Var εₜ = 1`);
//!   `Cₜ₊₁ = 0` when `t + 1` opens a new block, `Cₜ + wₜ · bₜ` otherwise.
//! - Loading: `Zₜ = (1, wₜ)` for cumulated measurements, `(0, wₜ)` for point
//!   measurements; pseudo-observations carry no measurement noise.
//! - Initialization: `α₀ = 0`, `Var b₀ = 1 / (1 − ρ²)` for AR(1). The random
//!   walk starts with unit variance on `b₀` plus a diffuse component along
//!   [`CholetteSsf::diffuse_direction`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights, when present, have exactly `len` entries and are finite.
//! - `ratio ≥ 2` and `phase < ratio` for cumulated measurements; `phase` is
//!   the position, within its low-frequency block, of the first modeled
//!   period.
use nalgebra::{Matrix2, RowVector2, Vector2};
use ndarray::Array1;

/// Bias dynamics: random walk or stationary AR(1), unit innovation variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dynamics {
    RandomWalk,
    Ar1 { rho: f64 },
}

impl Dynamics {
    /// `ρ = 1` selects the random walk, anything else an AR(1).
    pub fn from_rho(rho: f64) -> Self {
        if rho == 1.0 { Dynamics::RandomWalk } else { Dynamics::Ar1 { rho } }
    }

    pub fn rho(&self) -> f64 {
        match self {
            Dynamics::RandomWalk => 1.0,
            Dynamics::Ar1 { rho } => *rho,
        }
    }

    /// Proper (non-diffuse) part of the initial variance of `b₀`.
    pub fn initial_variance(&self) -> f64 {
        match self {
            Dynamics::RandomWalk => 1.0,
            Dynamics::Ar1 { rho } => 1.0 / (1.0 - rho * rho),
        }
    }

    pub fn is_diffuse(&self) -> bool {
        matches!(self, Dynamics::RandomWalk)
    }
}

/// How the weighted bias enters the pseudo-observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// Observation = sum of `w · b` over the block ending at the observed
    /// period; blocks are `ratio` periods long and the first modeled period
    /// sits at position `phase` of its block.
    Cumulated { ratio: usize, phase: usize },
    /// Observation = `w · b` at the observed period.
    Point,
}

/// CholetteSsf — one-dimensional-signal state-space model for benchmarking.
///
/// Fields
/// ------
/// - `len`: number of modeled (high-frequency) periods.
/// - `dynamics`: bias dynamics.
/// - `measurement`: cumulated or point loading.
/// - `weights`: optional per-period weights `wₜ`; `None` means `wₜ = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct CholetteSsf {
    len: usize,
    dynamics: Dynamics,
    measurement: Measurement,
    weights: Option<Array1<f64>>,
}

impl CholetteSsf {
    pub fn new(
        len: usize, dynamics: Dynamics, measurement: Measurement, weights: Option<Array1<f64>>,
    ) -> Self {
        debug_assert!(weights.as_ref().is_none_or(|w| w.len() == len), "weights length mismatch");
        debug_assert!(
            match measurement {
                Measurement::Cumulated { ratio, phase } => ratio >= 1 && phase < ratio,
                Measurement::Point => true,
            },
            "invalid cumulated measurement"
        );
        CholetteSsf { len, dynamics, measurement, weights }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn dynamics(&self) -> Dynamics {
        self.dynamics
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn weight(&self, t: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[t])
    }

    /// Whether period `t` opens a new low-frequency block.
    pub fn starts_block(&self, t: usize) -> bool {
        match self.measurement {
            Measurement::Cumulated { ratio, phase } => (t + phase) % ratio == 0,
            Measurement::Point => true,
        }
    }

    /// Transition matrix from `t` to `t + 1`.
    pub fn transition(&self, t: usize) -> Matrix2<f64> {
        let rho = self.dynamics.rho();
        match self.measurement {
            Measurement::Cumulated { .. } if !self.starts_block(t + 1) => {
                Matrix2::new(1.0, self.weight(t), 0.0, rho)
            }
            _ => Matrix2::new(0.0, 0.0, 0.0, rho),
        }
    }

    /// Loading row `Zₜ`.
    pub fn loading(&self, t: usize) -> RowVector2<f64> {
        match self.measurement {
            Measurement::Cumulated { .. } => RowVector2::new(1.0, self.weight(t)),
            Measurement::Point => RowVector2::new(0.0, self.weight(t)),
        }
    }

    /// Covariance of the transition disturbance (bias innovation only).
    pub fn innovation_variance(&self) -> Matrix2<f64> {
        Matrix2::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Proper part of the initial state distribution.
    pub fn initial_state(&self) -> (Vector2<f64>, Matrix2<f64>) {
        (Vector2::zeros(), Matrix2::new(0.0, 0.0, 0.0, self.dynamics.initial_variance()))
    }

    /// Direction of the diffuse initial component, if any.
    pub fn diffuse_direction(&self) -> Option<Vector2<f64>> {
        self.dynamics.is_diffuse().then(|| Vector2::new(0.0, 1.0))
    }

    /// Additive correction implied by a state at `t`: `wₜ · bₜ`.
    pub fn correction(&self, t: usize, state: &Vector2<f64>) -> f64 {
        self.weight(t) * state[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The cumulator must reset exactly at block boundaries determined by the
    // phase of the first period.
    //
    // Given
    // -----
    // - ratio = 4, phase = 2 (series starts in the third quarter).
    //
    // Expect
    // ------
    // - Blocks open at t = 2, 6, 10; transitions into those periods zero the
    //   cumulator row.
    fn cumulated_transition_resets_at_block_start() {
        // Arrange
        let ssf = CholetteSsf::new(
            12,
            Dynamics::Ar1 { rho: 0.8 },
            Measurement::Cumulated { ratio: 4, phase: 2 },
            None,
        );

        // Act
        let opens: Vec<usize> = (0..12).filter(|&t| ssf.starts_block(t)).collect();
        let into_start = ssf.transition(1);
        let inside = ssf.transition(2);

        // Assert
        assert_eq!(opens, vec![2, 6, 10]);
        assert_eq!(into_start, Matrix2::new(0.0, 0.0, 0.0, 0.8));
        assert_eq!(inside, Matrix2::new(1.0, 1.0, 0.0, 0.8));
    }

    #[test]
    fn point_measurement_loads_weighted_bias_only() {
        let w = Array1::from(vec![2.0, 3.0]);
        let ssf = CholetteSsf::new(2, Dynamics::RandomWalk, Measurement::Point, Some(w));
        assert_eq!(ssf.loading(1), RowVector2::new(0.0, 3.0));
        assert_eq!(ssf.correction(1, &Vector2::new(9.0, 0.5)), 1.5);
        assert_eq!(ssf.diffuse_direction(), Some(Vector2::new(0.0, 1.0)));
    }

    #[test]
    fn stationary_initial_variance_matches_ar1() {
        let dynamics = Dynamics::from_rho(0.6);
        assert_eq!(dynamics, Dynamics::Ar1 { rho: 0.6 });
        assert!((dynamics.initial_variance() - 1.0 / 0.64).abs() < 1e-15);
        assert!(!dynamics.is_diffuse());
        assert_eq!(Dynamics::from_rho(1.0), Dynamics::RandomWalk);
    }
}
