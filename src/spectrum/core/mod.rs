//! core — shared data, parameters, and configuration for size-spectrum fits.
//!
//! Purpose
//! -------
//! Collect the building blocks the estimation stack is assembled from:
//! observation containers, the parameter registry with its log-scale
//! transform, fleet selection, option bags, and the validation helpers
//! that police all of them. The density model and the estimators build on
//! top of these primitives.
//!
//! Key behaviors
//! -------------
//! - Define the lenient observation bundle ([`WeightData`], with
//!   [`WeightClasses`]) and its validated tagged form ([`WeightObs`]).
//! - Define the parameter registry (`Winf`, `Fm`, `Wfs`, `a` with their
//!   characteristic scales) and the transformed-scale container
//!   ([`ParamSet`]) the optimizer works on.
//! - Name the sampling gear via [`Fleet`] and carry run configuration in
//!   [`FitOptions`] / [`AssessOptions`].
//! - Centralize input checks in [`validation`] so every entry point
//!   reports the same first-offender errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights reaching the likelihood are finite and strictly positive;
//!   counts are non-negative with positive total. Both are enforced by
//!   [`WeightData::observations`], never re-checked downstream.
//! - Natural parameter values are strictly positive by construction of
//!   the log transform; [`ParamSet`] stores only finite transformed
//!   values.
//! - Start values and bounds in the option bags are scaled-natural /
//!   natural respectively; the transform to optimizer space happens in
//!   the estimation layer.
//!
//! Conventions
//! -----------
//! - Weights are grams, mortality rates are per year; the transformed
//!   scale is dimensionless.
//! - Parameter names are matched exactly ("Winf", "Fm", "Wfs", "a") and
//!   packed in registry order wherever a θ-vector is formed.
//!
//! Downstream usage
//! ----------------
//! - The density layer ([`crate::spectrum::density`]) reads natural
//!   values through [`ParamSet`]'s typed accessors and picks selectivity
//!   by [`Fleet`].
//! - The estimation layer merges free θ-vectors over a fixed base set via
//!   [`ParamSet::merged`] and validates configuration through the option
//!   bags' hooks.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover container construction and precedence,
//!   the natural↔transformed round trip, overlay semantics, validator
//!   first-offender reporting, and option defaults.

pub mod data;
pub mod fleet;
pub mod options;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{WeightClasses, WeightData, WeightObs};
pub use self::fleet::Fleet;
pub use self::options::{AssessOptions, FitOptions};
pub use self::params::{
    FM, PARAM_COUNT, PARAM_NAMES, PARAM_SCALES, PHYS_A, ParamSet, WFS, WINF, scale_of,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::spectrum::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::data::{WeightClasses, WeightData, WeightObs};
    pub use super::fleet::Fleet;
    pub use super::options::{AssessOptions, FitOptions};
    pub use super::params::{ParamSet, scale_of};
}
