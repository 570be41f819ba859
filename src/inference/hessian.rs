//! inference::hessian — curvature, covariance, and critical values at the
//! optimum.
//!
//! Purpose
//! -------
//! Turn a fitted objective into asymptotic uncertainty: the observed
//! curvature (Hessian and Jacobian of the negative log-likelihood at the
//! optimum), its Cholesky inversion into a variance-covariance matrix, the
//! standard errors on the matrix diagonal, and the standard-normal critical
//! value behind two-sided confidence bounds. This module handles the
//! conversion between `ndarray` and `nalgebra` types so the rest of the
//! crate never touches `nalgebra` directly.
//!
//! Key behaviors
//! -------------
//! - Call [`objective_curvature`] on a scalar negative log-likelihood
//!   closure to obtain the Hessian (via `compute_hessian`, central
//!   differences with a forward fallback) and the Jacobian (forward
//!   differences) at `θ̂`.
//! - Copy the `ndarray` Hessian into a `nalgebra::DMatrix`
//!   (`fill_dmatrix`) and invert it through a Cholesky factorization in
//!   [`covariance_matrix`].
//! - Read standard errors off the covariance diagonal via
//!   [`standard_errors`].
//! - Fetch the two-sided critical value `z = Φ⁻¹((1 + level) / 2)` via
//!   [`critical_z`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective closure maps evaluation failures to `NaN`; the
//!   finite-difference validators then reject the derived derivatives, so
//!   a broken objective surfaces as an `OptError` instead of a poisoned
//!   matrix.
//! - [`objective_curvature`] returns a finite, symmetric `n×n` Hessian
//!   with `n = θ̂.len()`; symmetry is enforced upstream by
//!   `compute_hessian`, and this module does not re-symmetrize.
//! - Inversion failure is **distinguishable, not fatal**: a Hessian that
//!   is not positive definite (or carries non-finite entries) makes
//!   [`covariance_matrix`] return `None`, and a negative or non-finite
//!   variance makes [`standard_errors`] return `None`. Callers degrade to
//!   a missing-CI result and keep the point estimate.
//!
//! Conventions
//! -----------
//! - All curvature is on the **negative log-likelihood** scale: at an
//!   interior maximum of `ℓ`, the Hessian of `-ℓ` is positive definite
//!   and its inverse is the asymptotic covariance of `θ̂`.
//! - Parameters live in the unconstrained optimizer space; confidence
//!   bounds built from these standard errors are back-transformed by the
//!   estimation layer, never symmetrized on the natural scale.
//!
//! Downstream usage
//! ----------------
//! - The estimation layer calls [`objective_curvature`] after a fit,
//!   threads the Hessian through [`covariance_matrix`] and
//!   [`standard_errors`], and combines the result with [`critical_z`] to
//!   build the confidence-interval table.
//! - [`fill_dmatrix`] is an internal bridge; library users should not
//!   need to invoke it directly.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the `ndarray`→`DMatrix` copy, curvature of a
//!   quadratic objective with known Hessian, Cholesky inversion of a
//!   diagonal matrix, the `None` paths for indefinite and non-finite
//!   input, and the 95% critical value.
use finitediff::FiniteDiff;
use nalgebra::{Cholesky, DMatrix};
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::optimization::{
    bounded_mle::{
        Grad, Theta, finite_diff::compute_hessian, types::Hessian, validation::validate_grad,
    },
    errors::{OptError, OptResult},
};

/// Observed curvature of the objective at the optimum.
///
/// - `hessian`: `n×n` Hessian of the negative log-likelihood at `θ̂`,
///   symmetrized. Positive definite at a regular interior optimum.
/// - `jacobian`: gradient vector of the objective at `θ̂`; near zero at a
///   well-converged interior optimum, larger on active bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Curvature {
    pub hessian: Hessian,
    pub jacobian: Grad,
}

/// Hessian and Jacobian of a scalar objective at `theta_hat`, by finite
/// differences.
///
/// `nll` is the negative log-likelihood as a plain closure; evaluation
/// failures inside it must surface as `NaN` so the derivative validators
/// can reject the result. The Jacobian is a forward-difference gradient;
/// the Hessian differentiates that gradient map via [`compute_hessian`]
/// (central differences, forward fallback, symmetrized).
///
/// # Errors
/// - `OptError::InvalidGradient` when the Jacobian picks up non-finite
///   entries (e.g. the objective failed near `theta_hat`).
/// - `OptError::InvalidHessian` / `OptError::HessianDimMismatch` from
///   [`compute_hessian`] when both difference schemes fail validation.
pub fn objective_curvature<F: Fn(&Theta) -> f64>(
    nll: &F, theta_hat: &Theta,
) -> OptResult<Curvature> {
    let dim = theta_hat.len();
    let jacobian = theta_hat.forward_diff(nll);
    validate_grad(&jacobian, dim)?;
    let grad_map = |theta: &Theta| theta.forward_diff(nll);
    let hessian = compute_hessian(&grad_map, theta_hat)?;
    Ok(Curvature { hessian, jacobian })
}

/// Invert an observed-information matrix into a variance-covariance
/// matrix, or report that it cannot be done.
///
/// The Hessian is copied into a `nalgebra::DMatrix` and factorized by
/// Cholesky; the factorization fails exactly when the matrix is not
/// positive definite, which is the numerically honest signal that the
/// optimum does not support asymptotic standard errors. Non-finite
/// entries and non-square input are treated the same way.
///
/// Returns `None` on any such failure; callers degrade to a missing-CI
/// result rather than fabricating uncertainty from a broken matrix.
pub fn covariance_matrix(hessian: &Hessian) -> Option<Array2<f64>> {
    let n = hessian.nrows();
    if n == 0 || hessian.ncols() != n {
        return None;
    }
    // Cholesky's positivity checks do not catch NaN; screen them here.
    if hessian.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut info = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(hessian, &mut info);
    let inverse = Cholesky::new(info)?.inverse();
    let mut cov = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        for i in 0..n {
            cov[[i, j]] = inverse[(i, j)];
        }
    }
    Some(cov)
}

/// Standard errors from the diagonal of a covariance matrix.
///
/// Returns `None` when any diagonal variance is negative or non-finite —
/// a covariance matrix that cannot price uncertainty for every parameter
/// prices it for none, keeping the CI table all-present or all-missing.
pub fn standard_errors(cov: &Array2<f64>) -> Option<Array1<f64>> {
    let n = cov.nrows();
    let mut se = Array1::<f64>::zeros(n);
    for i in 0..n {
        let var = cov[[i, i]];
        if !var.is_finite() || var < 0.0 {
            return None;
        }
        se[i] = var.sqrt();
    }
    Some(se)
}

/// Two-sided standard-normal critical value `z = Φ⁻¹((1 + level) / 2)`.
///
/// `level` is the confidence level, already validated to lie strictly
/// inside `(0, 1)` by the option layer; 0.95 gives `z ≈ 1.959964`.
///
/// # Errors
/// `OptError::BackendError` if the standard normal cannot be constructed
/// (does not happen for the unit parameters used here).
pub fn critical_z(level: f64) -> OptResult<f64> {
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| OptError::BackendError { text: e.to_string() })?;
    Ok(normal.inverse_cdf(0.5 * (1.0 + level)))
}

// ---- Helper methods ----

/// Copy an `ndarray` Hessian into a preallocated `nalgebra::DMatrix`.
///
/// Column-major writes to match `DMatrix` storage. No symmetrization is
/// performed here; any asymmetry present in `hessian` is preserved.
fn fill_dmatrix(hessian: &Hessian, out: &mut DMatrix<f64>) {
    let n = hessian.ncols();
    for j in 0..n {
        for i in j..n {
            if j == i {
                out[(i, i)] = hessian[[i, i]];
            } else {
                out[(i, j)] = hessian[[i, j]];
                out[(j, i)] = hessian[[j, i]];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Correct copying of Hessians from `ndarray` into `DMatrix`.
    // - Curvature of a quadratic objective with known analytic Hessian.
    // - Cholesky inversion of diagonal matrices and the `None` paths for
    //   indefinite and non-finite input.
    // - Standard-error extraction and its rejection of negative variances.
    // - The 95% standard-normal critical value.
    //
    // They intentionally DO NOT cover:
    // - End-to-end CI construction (estimation-layer tests).
    // - Pathological cases where `compute_hessian` itself fails (covered in
    //   the finite-difference tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `fill_dmatrix` copies entries without altering values or
    // symmetry.
    //
    // Given
    // -----
    // - A small 2×2 symmetric `Array2<f64>` with distinct entries.
    //
    // Expect
    // ------
    // - The corresponding `DMatrix` has identical entries at all positions.
    fn fill_dmatrix_copies_without_modification() {
        // Arrange
        let hessian: Hessian = array![[2.0, 0.5], [0.5, 1.0]];
        let mut out = DMatrix::<f64>::zeros(2, 2);

        // Act
        fill_dmatrix(&hessian, &mut out);

        // Assert
        assert_eq!(out[(0, 0)], 2.0);
        assert_eq!(out[(0, 1)], 0.5);
        assert_eq!(out[(1, 0)], 0.5);
        assert_eq!(out[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Check that `objective_curvature` recovers the known Hessian of a
    // quadratic objective, with a near-zero Jacobian at the minimum.
    //
    // Given
    // -----
    // - The objective `f(θ) = 2 θ₀² + 0.5 θ₁²`, minimized at the origin.
    //
    // Expect
    // ------
    // - Hessian ≈ diag(4, 1), Jacobian ≈ (0, 0).
    fn objective_curvature_matches_quadratic() {
        // Arrange
        let nll = |theta: &Theta| 2.0 * theta[0] * theta[0] + 0.5 * theta[1] * theta[1];
        let theta_hat: Theta = array![0.0, 0.0];

        // Act
        let curvature = objective_curvature(&nll, &theta_hat)
            .expect("curvature of a quadratic should be computable");

        // Assert
        assert_eq!(curvature.hessian.shape(), &[2, 2]);
        assert!((curvature.hessian[[0, 0]] - 4.0).abs() < 1e-4);
        assert!((curvature.hessian[[1, 1]] - 1.0).abs() < 1e-4);
        assert!(curvature.hessian[[0, 1]].abs() < 1e-4);
        assert!(curvature.jacobian.iter().all(|g| g.abs() < 1e-4));
    }

    #[test]
    // Purpose
    // -------
    // A broken objective (constant NaN) surfaces as an error rather than
    // producing a poisoned curvature.
    fn objective_curvature_rejects_nan_objective() {
        let nll = |_theta: &Theta| f64::NAN;
        let theta_hat: Theta = array![0.0];

        let result = objective_curvature(&nll, &theta_hat);

        assert!(matches!(result, Err(OptError::InvalidGradient { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Inversion of a positive-definite diagonal Hessian yields the
    // reciprocal diagonal, and the derived standard errors are the square
    // roots of those variances.
    //
    // Given
    // -----
    // - H = diag(4, 1).
    //
    // Expect
    // ------
    // - Covariance ≈ diag(0.25, 1.0), standard errors ≈ (0.5, 1.0).
    fn covariance_of_diagonal_hessian() {
        // Arrange
        let hessian: Hessian = array![[4.0, 0.0], [0.0, 1.0]];

        // Act
        let cov = covariance_matrix(&hessian).expect("PD matrix must invert");
        let se = standard_errors(&cov).expect("diagonal is positive");

        // Assert
        assert!((cov[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((cov[[1, 1]] - 1.0).abs() < 1e-12);
        assert!(cov[[0, 1]].abs() < 1e-12);
        assert!((se[0] - 0.5).abs() < 1e-12);
        assert!((se[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Indefinite and non-finite Hessians make `covariance_matrix` return
    // `None` instead of an error or a garbage matrix.
    fn covariance_fails_distinguishably() {
        // Negative curvature direction: not positive definite.
        let indefinite: Hessian = array![[1.0, 0.0], [0.0, -2.0]];
        assert!(covariance_matrix(&indefinite).is_none());

        // NaN slips past Cholesky's sign checks; the prescreen catches it.
        let poisoned: Hessian = array![[f64::NAN, 0.0], [0.0, 1.0]];
        assert!(covariance_matrix(&poisoned).is_none());

        // Non-square input cannot be an information matrix.
        let rect: Hessian = Array2::zeros((2, 3));
        assert!(covariance_matrix(&rect).is_none());
    }

    #[test]
    // Purpose
    // -------
    // A negative diagonal variance poisons the whole standard-error
    // vector: `standard_errors` returns `None`, never a partial vector.
    fn negative_variance_yields_no_standard_errors() {
        let cov: Array2<f64> = array![[0.25, 0.0], [0.0, -1e-9]];
        assert!(standard_errors(&cov).is_none());
    }

    #[test]
    // Purpose
    // -------
    // The two-sided 95% critical value matches the textbook constant.
    fn critical_z_matches_textbook_value() {
        let z = critical_z(0.95).expect("standard normal always constructs");
        assert!((z - 1.959964).abs() < 1e-5);
    }
}
