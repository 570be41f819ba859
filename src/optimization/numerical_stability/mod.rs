//! numerical_stability — numerically robust transformations and shared guards.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms plus the small numeric
//! guard constants used when evaluating the size-spectrum density and its
//! log-likelihood. This module centralizes cutoffs and floors so the rest
//! of the optimization and spectrum layers can assume well-conditioned
//! `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide a stable scalar softplus (`safe_softplus`) used by the
//!   log-logistic retention curve, which needs `ln(1 + exp(x))` without
//!   overflow at extreme steepness or weight ratios.
//! - Centralize the density floor (`PDF_FLOOR`) that keeps log-likelihood
//!   evaluations finite when trial parameters exclude part of the sample
//!   from the model support.
//! - Centralize the grid margin (`GRID_MARGIN`) that keeps the
//!   integration grid away from the growth singularity at the asymptotic
//!   weight.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; domain and shape
//!   validation (e.g. positivity, length checks) is enforced in the
//!   spectrum and optimizer layers, not here.
//! - The constants are fixed global guards; callers do not tune them per
//!   fit.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//! - Panics and `unsafe` are avoided under normal usage; invalid inputs
//!   should be caught by upstream validation and surfaced as
//!   domain-specific error types.
//!
//! Downstream usage
//! ----------------
//! - The density layer evaluates retention through `safe_softplus` and
//!   builds its integration grid against `GRID_MARGIN`.
//! - The likelihood layer floors per-observation densities at
//!   `PDF_FLOOR` before taking logs.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement of the stable
//!   softplus with the naïve formula on safe grids, identity behavior
//!   beyond the cutoff, and sanity of the guard constants.
//! - Integration tests in the spectrum and estimation modules exercise
//!   higher-level invariants (support handling, optimizer robustness)
//!   rather than re-testing these low-level numeric primitives.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{GRID_MARGIN, PDF_FLOOR, safe_softplus};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{GRID_MARGIN, PDF_FLOOR, safe_softplus};
}
