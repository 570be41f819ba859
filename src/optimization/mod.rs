//! optimization — bounded MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed, box-constrained log-likelihood optimizer, numerically
//! stable transforms and guard constants, and a single error/result
//! surface. Callers implement a log-likelihood, choose tolerances and
//! bounds, and obtain fitted parameters and diagnostics without touching
//! backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   under box constraints (`bounded_mle`), including configuration of
//!   solvers and stopping criteria.
//! - Supply shared numerical primitives (`numerical_stability`) for the
//!   stable softplus used by retention curves and the guard constants
//!   that keep density and likelihood evaluations finite.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` (here, the
//!   log scale of the spectrum parameters) and assume that inputs are
//!   finite once validation has passed; invalid states are reported as
//!   `OptError`, not panics.
//! - Log-likelihood implementations are expected to treat domain violations
//!   (e.g., collapsed density support) as recoverable errors surfaced
//!   through the optimization layer.
//! - Bound, positivity, and dimension checks are enforced via shared
//!   validation and error conversions, so downstream code can assume that
//!   accepted parameters satisfy basic domain constraints.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters, gradients, and Hessians are represented using `ndarray`-
//!   based aliases (`Theta`, `Grad`, `Hessian` types); any mapping between
//!   optimizer θ-space and natural-scale spectrum parameters is handled by
//!   the parameter layer in `spectrum::core`.
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors or model-specific error enums.
//! - This module and its submodules avoid I/O; progress reporting happens
//!   behind the optional `obs_slog` observer feature and in higher layers.
//!
//! Downstream usage
//! ----------------
//! - The estimation layer implements `LogLikelihood` for its weight-
//!   frequency objectives and calls `maximize` with a parameter guess,
//!   data payload, a `Bounds` box, and `MLEOptions` to obtain an
//!   `OptimOutcome` (via `bounded_mle`).
//! - The inference layer uses `bounded_mle::finite_diff` for curvature at
//!   the optimum and `numerical_stability` constants when reconstructing
//!   likelihood closures.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`, which forwards the submodule preludes and
//!   the core error types, or they depend directly on
//!   `bounded_mle::prelude` / `numerical_stability::prelude` when they
//!   want a more fine-grained split.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns:
//!   - `bounded_mle`: solver wiring, tolerance handling, clamping and
//!     projection, and basic MLE behavior on toy models.
//!   - `numerical_stability`: agreement with naïve formulas on safe grids
//!     and sanity of the guard constants.
//!   - `errors`: conversions from backend/model errors into `OptError`.
//! - Higher-level integration tests exercise end-to-end MLE workflows,
//!   verifying that configuration mistakes, numerical problems, and backend
//!   failures all surface as sensible `OptError` values and that successful
//!   runs produce stable `OptimOutcome`s.

pub mod bounded_mle;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::bounded_mle::prelude::*;
    pub use super::errors::{OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
