//! Box constraints for log-likelihood optimization.
//!
//! L-BFGS itself is an unconstrained method. This module supplies the two
//! pieces that turn it into a projected variant suitable for simple box
//! constraints:
//!
//! - **Clamping**: every cost/gradient evaluation first clamps the trial
//!   point into `[lower, upper]`, so the model never sees an infeasible
//!   `θ` even when a line search overshoots.
//! - **Gradient projection**: at an active bound, the gradient component
//!   that points outside the box is zeroed. The solver then measures
//!   convergence against the projected gradient, so a solution pinned to
//!   a bound can still terminate on the gradient tolerance.
//!
//! Infinite bounds are valid and turn the corresponding side off;
//! [`Bounds::unbounded`] recovers plain unconstrained behavior.
use crate::optimization::{
    bounded_mle::types::{Grad, Theta},
    errors::{OptError, OptResult},
};

/// Tolerance for deciding that a coordinate sits on a bound.
///
/// A coordinate within this distance of its lower or upper bound is
/// treated as active for gradient projection.
pub const BOUND_ACTIVE_EPS: f64 = 1e-10;

/// Elementwise box constraints `lower[i] <= theta[i] <= upper[i]`.
///
/// Bounds may be `-inf`/`+inf` to disable a side. Construction validates
/// shape agreement and pair ordering; all downstream code may assume a
/// well-formed box.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Theta,
    upper: Theta,
}

impl Bounds {
    /// Build a validated box from lower and upper bound vectors.
    ///
    /// # Rules
    /// - `lower.len() == upper.len()`.
    /// - No bound may be NaN (`±inf` is fine).
    /// - `lower[i] <= upper[i]` for every coordinate.
    ///
    /// # Errors
    /// - [`OptError::BoundsDimMismatch`] on length disagreement.
    /// - [`OptError::InvalidBoundPair`] for a NaN bound or an inverted pair.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::BoundsDimMismatch {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(OptError::InvalidBoundPair { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    /// An all-infinite box of dimension `dim` (no active constraints).
    pub fn unbounded(dim: usize) -> Self {
        Self {
            lower: Theta::from_elem(dim, f64::NEG_INFINITY),
            upper: Theta::from_elem(dim, f64::INFINITY),
        }
    }

    /// Number of constrained coordinates (the box dimension).
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// `true` when the box has dimension zero.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Lower bound vector.
    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    /// Upper bound vector.
    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    /// Clamp `theta` into the box in place.
    pub fn clamp(&self, theta: &mut Theta) {
        for ((value, &lo), &hi) in theta.iter_mut().zip(self.lower.iter()).zip(self.upper.iter())
        {
            if *value < lo {
                *value = lo;
            } else if *value > hi {
                *value = hi;
            }
        }
    }

    /// Return a clamped copy of `theta`.
    pub fn clamped(&self, theta: &Theta) -> Theta {
        let mut out = theta.clone();
        self.clamp(&mut out);
        out
    }

    /// Project a **cost** gradient at `theta` onto the feasible directions.
    ///
    /// Zeroes gradient components that would drive a descent step outside
    /// the box: at an active lower bound a positive cost-gradient component
    /// (descent pushes down) is zeroed, and at an active upper bound a
    /// negative one (descent pushes up) is zeroed. Activity is decided with
    /// [`BOUND_ACTIVE_EPS`] slack.
    pub fn project_gradient(&self, theta: &Theta, grad: &mut Grad) {
        for i in 0..theta.len().min(grad.len()) {
            let at_lower = theta[i] <= self.lower[i] + BOUND_ACTIVE_EPS;
            let at_upper = theta[i] >= self.upper[i] - BOUND_ACTIVE_EPS;
            if (at_lower && grad[i] > 0.0) || (at_upper && grad[i] < 0.0) {
                grad[i] = 0.0;
            }
        }
    }
}
