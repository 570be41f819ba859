//! bounded_mle — box-constrained, argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)` under simple box constraints. Callers implement
//! a single trait, [`LogLikelihood`], and invoke [`maximize`] with a
//! [`Bounds`] box to run L-BFGS with a configurable line search,
//! tolerances, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - Enforce box constraints by clamping every trial point before model
//!   evaluation and projecting the cost gradient at active bounds
//!   ([`bounds`]), turning plain L-BFGS into a projected variant.
//! - Expose a single, user-facing entrypoint [`maximize`] that:
//!   - checks bounds/start dimension agreement and clamps the start,
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - selects an L-BFGS solver via [`builders`] based on [`traits::LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide robust finite-difference helpers in [`finite_diff`] for
//!   gradients and Hessians when analytic derivatives are missing, with
//!   post-hoc validation and error capture.
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`]) and
//!   validation logic ([`validation`]) so downstream code can assume sane,
//!   finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** a log-likelihood `ℓ(θ)` by minimizing
//!   a cost `c(θ) = -ℓ(θ)`; user code must implement `ℓ(θ)` and `∇ℓ(θ)`
//!   (when available), **never** the cost directly.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] must treat invalid
//!   inputs as recoverable `OptError` values, not panics.
//! - Vectors and matrices use the canonical aliases [`Theta`], [`Grad`],
//!   [`types::Hessian`]; all are assumed finite whenever optimization proceeds.
//! - Configuration types ([`Tolerances`], [`MLEOptions`], [`Bounds`]) are
//!   validated on construction and are treated as internally consistent by
//!   the solver layer.
//! - `OptimOutcome::converged` is `true` only for genuine solver
//!   convergence (`SolverConverged` / `TargetCostReached`); an exhausted
//!   iteration budget reports the best point with `converged == false`.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained optimizer space as [`Theta`]
//!   (`Array1<f64>`); any mapping from model scale to optimizer scale
//!   (e.g. log transforms) happens in the model layer, and [`Bounds`] are
//!   expressed on the optimizer scale.
//! - Cost is always `c(θ) = -ℓ(θ)` internally; all user-facing APIs and
//!   diagnostics (including [`OptimOutcome::value`]) are expressed in terms
//!   of the log-likelihood `ℓ`.
//! - Gradients exposed by [`LogLikelihood::grad`] are for the log-likelihood
//!   (`∇ℓ(θ)`); the adapter is responsible for flipping signs to obtain the
//!   cost gradient (`∇c(θ) = -∇ℓ(θ)`) and for projecting it against the box.
//! - Errors bubble up as `OptResult<T>` / `OptError`; this module and its
//!   children never intentionally panic or use `unsafe`.
//!
//! Downstream usage
//! ----------------
//! - The estimation layer implements [`LogLikelihood`] for its weight-
//!   frequency objectives, then calls [`maximize`] with:
//!   - a model instance,
//!   - an initial parameter vector [`Theta`] on the log scale,
//!   - a data payload,
//!   - a [`Bounds`] box mapped from natural-scale bounds, and
//!   - an [`MLEOptions`] configuration (tolerances, line search, L-BFGS
//!     memory).
//! - The inference layer reuses [`finite_diff::compute_hessian`] to obtain
//!   curvature at the fitted optimum for standard errors.
//! - Internal optimizer code:
//!   - uses [`adapter`] to bridge into Argmin,
//!   - uses [`builders`] to construct L-BFGS solvers with the chosen
//!     line search,
//!   - delegates execution to [`run::run_lbfgs`], and
//!   - relies on [`finite_diff`] and [`validation`] for derivative and
//!     state checks.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover:
//!   - sign conventions, clamping, and gradient projection in [`adapter`],
//!   - bound construction and projection rules in [`bounds`],
//!   - solver construction and tolerance wiring in [`builders`],
//!   - finite-difference + validation behavior in [`finite_diff`],
//!   - configuration and outcome invariants in [`traits`].
//! - The api-level tests exercise [`maximize`] end to end on concave toy
//!   likelihoods, verifying interior optima, bound-pinned optima, and
//!   dimension checks.

pub mod adapter;
pub mod api;
pub mod bounds;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::bounds::Bounds;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::optimization::bounded_mle::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::bounds::Bounds;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
