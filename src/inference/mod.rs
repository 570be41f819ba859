//! inference — asymptotic uncertainty for fitted spectrum parameters.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification on top of a fitted
//! objective: finite-difference curvature (Hessian and Jacobian) at the
//! optimum, Cholesky inversion into a variance-covariance matrix with
//! distinguishable failure, standard errors from the covariance diagonal,
//! and the standard-normal critical value used by two-sided confidence
//! bounds. Everything is expressed in the unconstrained optimizer
//! parameter space `θ`.
//!
//! Key behaviors
//! -------------
//! - Compute observed curvature at the optimum via
//!   [`hessian::objective_curvature`].
//! - Invert the observed information through a Cholesky factorization via
//!   [`hessian::covariance_matrix`]; non-positive-definite input returns
//!   `None` rather than an error.
//! - Extract per-parameter standard errors via
//!   [`hessian::standard_errors`].
//! - Supply the critical value `z = Φ⁻¹((1 + level) / 2)` via
//!   [`hessian::critical_z`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Curvature is taken on the **negative log-likelihood** scale, so the
//!   information matrix at a regular interior optimum is positive
//!   definite and its inverse is the asymptotic covariance of `θ̂`.
//! - Inversion failure is a degradation signal, not a fatal error: the
//!   `Option` return lets the estimation layer keep the point estimate
//!   and report a missing confidence-interval table.
//!
//! Conventions
//! -----------
//! - Parameters `θ` live in unconstrained optimizer space; any mapping to
//!   natural-scale values (and the asymmetric natural-scale intervals that
//!   follow) is handled upstream in the estimation code.
//! - Hard numerical failures (broken derivatives) are reported via
//!   `OptResult`; recoverable ones (singular information) via `Option`.
//!
//! Downstream usage
//! ----------------
//! - After a fit, the estimation layer threads the objective closure and
//!   `θ̂` through `objective_curvature → covariance_matrix →
//!   standard_errors`, combines the result with `critical_z`, and
//!   back-transforms the bounds into the reported CI table.
//!
//! Testing notes
//! -------------
//! - Unit tests live with the `hessian` module and cover the quadratic
//!   curvature case, Cholesky inversion and its `None` paths, and the
//!   critical-value constant.
//! - Integration tests at the estimation layer verify that singular
//!   information degrades to a missing CI table while the point estimate
//!   survives.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{
    Curvature, covariance_matrix, critical_z, objective_curvature, standard_errors,
};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::hessian::{
        Curvature, covariance_matrix, critical_z, objective_curvature, standard_errors,
    };
}
