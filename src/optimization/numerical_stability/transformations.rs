//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form, plus the small
//! numeric guards shared by the density and likelihood layers.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`PDF_FLOOR`]: the smallest density value reported by the size
//!   spectrum; log-densities are floored at `ln(PDF_FLOOR)` so that
//!   observations outside the model support penalize the likelihood
//!   heavily without producing infinite cost.
//! - [`GRID_MARGIN`]: relative distance kept between the top of the
//!   integration grid and the asymptotic weight, where growth vanishes
//!   and the spectrum integrand is singular.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//!
//! # Rationale
//! These guards are building blocks for likelihood evaluation: line
//! searches probe extreme parameter values, and every probe must come
//! back finite for the optimizer to recover.

/// Density floor for log-likelihood evaluation.
///
/// Observed weights that fall outside the support implied by a trial
/// parameter vector (e.g. above the trial asymptotic weight) would have
/// zero density and an infinite negative log-likelihood. Flooring the
/// density at this value keeps the cost finite so the line search can
/// back off instead of aborting.
pub const PDF_FLOOR: f64 = 1e-12;

/// Relative margin between the top grid node and the asymptotic weight.
///
/// Growth `g(w)` vanishes as `w → Winf`, so the number-density integrand
/// `exp(-H(w)) / g(w)` is singular at the asymptote. The integration grid
/// stops at `Winf * (1 - GRID_MARGIN)` to stay clear of it.
pub const GRID_MARGIN: f64 = 1e-6;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// The cutoff used here (`x > 20.0`) is a practical threshold that
/// keeps the calculation in a well-conditioned regime for `f64`
/// (similar to the strategy used in common ML libraries like PyTorch).
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}
