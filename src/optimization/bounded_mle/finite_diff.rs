//! bounded_mle::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! parameter vector, together with validation and symmetry cleanup, so that
//! the rest of the optimizer and the inference layer can request
//! derivatives without depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - Compute forward-difference gradients with error capture and
//!   post-hoc validation via [`run_fd_diff`].
//! - Construct central-difference Hessians, falling back to forward
//!   differences when validation fails, via [`compute_hessian`].
//! - Enforce symmetry of Hessian matrices in-place using
//!   [`symmetrize_hess`] to prepare them for curvature checks and
//!   factorizations.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter vectors, gradients, and Hessians are all represented as
//!   `ndarray` containers over `f64` (`Theta`, `Grad`, `Hessian`).
//! - Any error raised by the user-supplied objective during finite
//!   differencing is routed into the shared `closure_err` cell and
//!   treated as a hard failure for the gradient computation.
//! - Gradients and Hessians returned from this module are guaranteed to
//!   satisfy [`validate_grad`] and [`validate_hessian`] on the chosen
//!   finite-difference path.
//!
//! Conventions
//! -----------
//! - Finite differences are taken with respect to the unconstrained
//!   parameter vector `Theta`; clamping and reparameterization are
//!   handled by the layers that build the closures.
//! - Central-difference Hessians are preferred; forward-difference is
//!   used only as a fallback when the central approximation fails
//!   validation.
//! - Domain errors are surfaced as `OptError` via `OptResult<T>`;
//!   Argmin’s `Error` is confined to the thin boundary where
//!   finite-difference closures are invoked.
//!
//! Downstream usage
//! ----------------
//! - The optimizer adapter calls [`run_fd_diff`] when a `LogLikelihood`
//!   implementation does not provide an analytic gradient and the solver
//!   needs a finite-difference approximation.
//! - The inference layer calls [`compute_hessian`] at the fitted optimum
//!   to obtain the curvature matrix behind asymptotic standard errors.
//!
//! Testing notes
//! -------------
//! - Unit tests cover both successful and failing paths for gradient and
//!   Hessian validation, including the central→forward Hessian fallback
//!   behavior.
//! - Integration tests for the full optimizer exercise these helpers
//!   implicitly when derivatives are requested via finite differences.
use crate::optimization::{
    bounded_mle::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
    errors::OptResult,
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient with error capture and validation.
///
/// The FD closure can’t return `Result`, so any error raised by `func` is
/// stored into `closure_err` and the closure returns `NaN`. This helper:
/// - clears `closure_err`,
/// - performs `forward_diff`,
/// - if an error was captured, returns it as `Err`,
/// - validates the resulting gradient,
/// - if validation succeeds, returns the gradient as `Ok(grad)`.
///
/// # Parameters
/// - `theta`: point at which the gradient is approximated; its length
///   defines the expected gradient dimension.
/// - `func`: scalar objective; assumed to route evaluation errors into
///   `closure_err` and return `NaN` in that case.
/// - `closure_err`: shared cell capturing an `argmin::core::Error` raised
///   inside `func` while the FD routine is running.
///
/// # Errors
/// - Any error captured in `closure_err` during evaluation (converted via
///   `From<Error>`).
/// - `OptError::GradientDimMismatch` / `OptError::InvalidGradient` from
///   [`validate_grad`].
///
/// # Examples
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::Array1;
/// # use sizefreq::optimization::bounded_mle::Theta;
/// # use sizefreq::optimization::bounded_mle::finite_diff::run_fd_diff;
/// let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
///
/// // Simple quadratic objective with no internal error path.
/// let f = |x: &Theta| x.dot(x);
///
/// let grad = run_fd_diff(&theta, &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), theta.len());
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Finite-difference Hessian with validation and symmetrization.
///
/// Approximates the Hessian of a vector-valued gradient function at
/// `theta`, preferring a central-difference scheme and falling back to a
/// forward-difference scheme when validation fails. The resulting matrix
/// is symmetrized in-place before being returned.
///
/// # Parameters
/// - `f`: gradient function mapping `theta` to a gradient vector; the FD
///   Hessian routines differentiate each component numerically.
/// - `theta`: point at which the Hessian is approximated; its length
///   defines the expected `dim × dim` shape.
///
/// # Errors
/// - `OptError::HessianDimMismatch` / `OptError::InvalidHessian` when both
///   the central- and forward-difference paths fail validation. The
///   central-difference validation error is intentionally discarded; only
///   the forward-difference result is surfaced.
///
/// # Examples
/// ```rust
/// # use ndarray::Array1;
/// # use sizefreq::optimization::bounded_mle::Theta;
/// # use sizefreq::optimization::bounded_mle::finite_diff::compute_hessian;
/// // Gradient of a simple quadratic: g(θ) = 2θ.
/// let grad_fn = |theta: &Theta| theta.mapv(|x| 2.0 * x);
///
/// let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
/// let hess = compute_hessian(&grad_fn, &theta).unwrap();
/// assert_eq!(hess.shape(), &[2, 2]);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Enforce symmetry of a Hessian matrix in-place.
///
/// Replaces each off-diagonal pair `(i, j)` / `(j, i)` with their average,
/// leaving the diagonal untouched. Called only after the Hessian has
/// passed [`validate_hessian`], so no finiteness or shape checks are
/// repeated here.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use argmin::core::ArgminError;
    use ndarray::{Array1, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward-difference gradient computation with and without closure errors.
    // - Validation failures for non-finite gradients.
    // - Finite-difference Hessian construction, symmetry, and validation.
    // - In-place symmetrization behavior for Hessian matrices.
    //
    // They intentionally DO NOT cover:
    // - End-to-end optimizer behavior (handled in higher-level integration tests).
    // - Specific LogLikelihood model implementations.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `run_fd_diff` returns a valid gradient for a simple quadratic
    // objective with no internal error path.
    //
    // Given
    // -----
    // - A parameter vector `theta` in ℝ².
    // - An objective `f(theta) = thetaᵀ theta` with no error side channel.
    //
    // Expect
    // ------
    // - `run_fd_diff` returns `Ok(grad)` with `grad.len() == theta.len()`.
    // - All gradient entries are finite.
    fn run_fd_diff_quadratic_returns_valid_gradient() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |x: &Theta| x.dot(x);

        // Act
        let result = run_fd_diff(&theta, &f, &closure_err);

        // Assert
        let grad = result.expect("Gradient for quadratic should be computed successfully");
        assert_eq!(grad.len(), theta.len());
        assert!(grad.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `run_fd_diff` propagates an error captured in `closure_err`
    // as an `OptError` via the `From<Error>` implementation.
    //
    // Given
    // -----
    // - A parameter vector `theta` in ℝ¹.
    // - An objective closure that writes an `ArgminError` into `closure_err`
    //   and returns `NaN`.
    //
    // Expect
    // ------
    // - `run_fd_diff` returns `Err(e)` rather than a gradient.
    // - The error is mapped into an appropriate `OptError` variant.
    fn run_fd_diff_closure_error_is_propagated() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);

        let f = |_: &Theta| {
            let argmin_err = ArgminError::NotImplemented { text: "fd test".to_string() };
            // Store the error in the shared cell and return NaN.
            closure_err.replace(Some(argmin_err.into()));
            f64::NAN
        };

        // Act
        let result = run_fd_diff(&theta, &f, &closure_err);

        // Assert
        let err = result.expect_err("Error in closure should cause run_fd_diff to fail");
        match err {
            OptError::NotImplemented { .. } | OptError::BackendError { .. } => {}
            other => panic!("Unexpected OptError variant from closure error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Confirm that `run_fd_diff` returns an error when the finite-difference
    // gradient contains non-finite entries.
    //
    // Given
    // -----
    // - A parameter vector `theta` in ℝ².
    // - An objective that always returns `NaN`, causing the FD gradient to be
    //   filled with `NaN`.
    //
    // Expect
    // ------
    // - `run_fd_diff` returns `Err(OptError::InvalidGradient { .. })`.
    fn run_fd_diff_non_finite_gradient_yields_invalidgradient_error() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_x: &Theta| f64::NAN;

        // Act
        let result = run_fd_diff(&theta, &f, &closure_err);

        // Assert
        let err = result.expect_err("Non-finite gradient should cause an error");
        match err {
            OptError::InvalidGradient { .. } => {}
            other => panic!("Expected InvalidGradient, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `compute_hessian` produces a finite, symmetric Hessian for a
    // simple quadratic model where the gradient is linear.
    //
    // Given
    // -----
    // - A parameter vector `theta` in ℝ².
    // - A gradient function `g(theta) = 2 * theta` corresponding to
    //   `f(theta) = ||theta||²`.
    //
    // Expect
    // ------
    // - `compute_hessian` returns `Ok(hess)` with shape (2, 2).
    // - `hess` is symmetric and has finite entries.
    fn compute_hessian_quadratic_returns_symmetric_matrix() {
        // Arrange
        let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
        let grad_fn = |theta: &Theta| theta.mapv(|x| 2.0 * x);

        // Act
        let hess = compute_hessian(&grad_fn, &theta)
            .expect("Hessian for quadratic gradient should be computed successfully");

        // Assert
        assert_eq!(hess.shape(), &[2, 2]);
        // Symmetry check
        assert!((hess[[0, 1]] - hess[[1, 0]]).abs() < 1e-10);
        assert!(hess.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `compute_hessian` surfaces a validation error when both the
    // central- and forward-difference Hessians contain non-finite entries.
    //
    // Given
    // -----
    // - A parameter vector `theta` in ℝ¹.
    // - A gradient function that returns `NaN` in its single component.
    //
    // Expect
    // ------
    // - `compute_hessian` returns `Err(OptError::InvalidHessian { .. })`.
    fn compute_hessian_non_finite_entries_yield_invalidhessian_error() {
        // Arrange
        let theta: Theta = Array1::from(vec![0.0_f64]);
        let grad_fn = |_theta: &Theta| Array1::from(vec![f64::NAN]);

        // Act
        let result = compute_hessian(&grad_fn, &theta);

        // Assert
        let err = result.expect_err("Non-finite Hessian entries should cause an error");
        match err {
            OptError::InvalidHessian { .. } => {}
            other => panic!("Expected InvalidHessian, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `symmetrize_hess` makes a matrix numerically symmetric by
    // averaging each off-diagonal pair.
    //
    // Given
    // -----
    // - A 2x2 matrix with unequal off-diagonal entries.
    //
    // Expect
    // ------
    // - After calling `symmetrize_hess`, the off-diagonal entries are equal to
    //   their average and the diagonal remains unchanged.
    fn symmetrize_hess_makes_matrix_symmetric() {
        // Arrange
        let mut h: Hessian = Array2::from_shape_vec((2, 2), vec![1.0_f64, 2.0, 0.0, 3.0]).unwrap();

        let before_diag = (h[[0, 0]], h[[1, 1]]);
        let expected_avg = 0.5 * (h[[0, 1]] + h[[1, 0]]);

        // Act
        super::symmetrize_hess(&mut h);

        // Assert
        assert_eq!(h[[0, 0]], before_diag.0);
        assert_eq!(h[[1, 1]], before_diag.1);
        assert!((h[[0, 1]] - expected_avg).abs() < 1e-12);
        assert!((h[[1, 0]] - expected_avg).abs() < 1e-12);
        assert_eq!(h[[0, 1]], h[[1, 0]]);
    }
}
