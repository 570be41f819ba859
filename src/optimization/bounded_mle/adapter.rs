//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. Analytic gradients (if
//! provided by the user) are negated accordingly. If a gradient is not
//! provided, we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! Box constraints are enforced here rather than in the solver: every
//! trial point is clamped into the feasible box before the model sees it,
//! and the cost gradient is projected so that components pointing out of
//! the box at an active bound are zeroed. L-BFGS then behaves as a
//! projected-gradient variant and can converge on a bound.
use std::cell::RefCell;

use crate::optimization::{
    bounded_mle::{
        bounds::Bounds,
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
    errors::OptError,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` clamps `θ` into the box and returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns the projected cost gradient:
///   - `-∇ℓ(θ)` if the user provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed),
///
///   in both cases with outward components zeroed at active bounds.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub bounds: &'a Bounds,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(clamp(θ))`.
    ///
    /// - Clamps `θ` into the feasible box, so line-search overshoots never
    ///   reach the model.
    /// - Calls the user's `value(θ, data)` and checks the result is finite.
    /// - Returns `Error(NonFiniteCost)` if the value is not finite.
    ///
    /// # Errors
    /// Propagates any `OptError` from the user’s `value` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let theta_c = self.bounds.clamped(theta);
        let output = self.f.value(&theta_c, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the projected gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - Clamps `θ` into the feasible box first; derivatives are taken at
    ///   the clamped point.
    /// - If the user implements `grad(θ, data)`, we validate it and negate it
    ///   (because the cost is `-ℓ`).
    /// - Otherwise, we compute a finite-difference gradient of the **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), or the central gradient fails validation, retry
    ///     once with *forward* differences.
    /// - Either way, the resulting cost gradient is projected against the
    ///   box before being handed to the solver.
    ///
    /// Implementation notes:
    /// - The FD closure must return `f64`, so we can’t use `?` inside it; we capture
    ///   the first error in `closure_err` and return `NaN` from the closure. After
    ///   FD, we turn that captured error back into a real error (or switch to
    ///   forward diff).
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        let theta_c = self.bounds.clamped(theta);
        let mut cost_grad: Grad = match self.f.grad(&theta_c, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                -g
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |t: &Theta| -> f64 {
                    match self.cost(t) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta_c.central_diff(&cost_func);
                if closure_err.borrow().is_some() || validate_grad(&fd_grad, dim).is_err() {
                    run_fd_diff(&theta_c, &cost_func, &closure_err)?
                } else {
                    fd_grad
                }
            }
            Err(e) => return Err(e.into()),
        };
        self.bounds.project_gradient(&theta_c, &mut cost_grad);
        Ok(cost_grad)
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood`, its data, and
    /// the feasible box.
    pub fn new(f: &'a F, data: &'a F::Data, bounds: &'a Bounds) -> Self {
        Self { f, data, bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign convention of the cost (`cost = -value`).
    // - Clamping of trial points before model evaluation.
    // - Finite-difference gradient fallback and projection at active bounds.
    //
    // They intentionally DO NOT cover:
    // - Full L-BFGS runs (handled by the api-level tests).
    // -------------------------------------------------------------------------

    /// Concave quadratic `ℓ(θ) = -(θ - 2)²` with a maximum at θ = 2.
    struct ShiftedQuadratic;

    impl LogLikelihood for ShiftedQuadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            let d = theta[0] - 2.0;
            Ok(-(d * d))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter negates the log-likelihood and clamps infeasible trial
    // points onto the box edge before evaluating.
    fn cost_negates_and_clamps() {
        // Arrange: box [0, 1], so the unconstrained maximum at 2 is outside.
        let f = ShiftedQuadratic;
        let bounds = Bounds::new(array![0.0], array![1.0]).unwrap();
        let adapter = ArgMinAdapter::new(&f, &(), &bounds);

        // Act: evaluate at an infeasible point; it should be clamped to 1.
        let cost = adapter.cost(&array![5.0]).unwrap();

        // Assert: value at θ = 1 is -(1 - 2)² = -1, so cost = 1.
        assert!((cost - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient, the FD fallback produces the cost
    // gradient `2(θ - 2)` at an interior point.
    fn fd_gradient_matches_analytic_at_interior_point() {
        // Arrange
        let f = ShiftedQuadratic;
        let bounds = Bounds::unbounded(1);
        let adapter = ArgMinAdapter::new(&f, &(), &bounds);

        // Act
        let grad = adapter.gradient(&array![0.5]).unwrap();

        // Assert: d/dθ of cost (θ - 2)² is 2(θ - 2) = -3 at θ = 0.5.
        assert!((grad[0] - (-3.0)).abs() < 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // At the upper bound with the optimum outside, the raw descent
    // direction points out of the box and must be projected to zero.
    fn gradient_is_projected_at_active_bound() {
        // Arrange: optimum at 2, box capped at 1.
        let f = ShiftedQuadratic;
        let bounds = Bounds::new(array![0.0], array![1.0]).unwrap();
        let adapter = ArgMinAdapter::new(&f, &(), &bounds);

        // Act: at θ = 1 (active upper bound) the cost gradient 2(θ - 2) = -2
        // would push the solver upward out of the box.
        let grad = adapter.gradient(&array![1.0]).unwrap();

        // Assert
        assert_eq!(grad[0], 0.0);
    }
}
