//! spectrum — steady-state size-spectrum stack: data, parameters, density,
//! and simulation.
//!
//! Purpose
//! -------
//! Provide the population-model layer of the crate under one namespace:
//! observation containers and the parameter registry in [`core`], the
//! steady-state density model and yield curve in [`density`], weight
//! simulation in [`simulate`], and the shared error types in [`errors`].
//! The estimation layer builds its likelihoods and batch driver on this
//! surface.
//!
//! Key behaviors
//! -------------
//! - Collect data and configuration primitives in [`core`]: the lenient
//!   [`WeightData`] bundle with its validated [`WeightObs`] form, the
//!   [`ParamSet`] log-scale parameter container, [`Fleet`] selection, and
//!   the [`FitOptions`] / [`AssessOptions`] bags.
//! - Evaluate the fished steady state in [`density`]: [`SpectrumModel`]
//!   holds the structural constants, [`SpectrumModel::curve`] produces a
//!   normalized [`DensityCurve`] per parameter set and fleet, and the
//!   yield curve / [`SpectrumModel::fmsy`] derive the reference point.
//! - Draw reproducible synthetic weights in [`simulate`].
//! - Centralize spectrum-specific errors in [`errors`] (`SpectrumError`,
//!   `ParamError`, and the `SpectrumResult` / `ParamResult` aliases).
//!
//! Invariants & assumptions
//! ------------------------
//! - Observations reaching the likelihood went through
//!   [`WeightData::observations`]: weights finite and strictly positive,
//!   frequencies non-negative with positive total.
//! - Natural parameter values are strictly positive by construction of the
//!   log transform; the density layer additionally rejects overflowed
//!   values and degenerate supports.
//! - The density is strictly positive over its declared support and
//!   floored elsewhere, so log-likelihoods stay finite.
//!
//! Conventions
//! -----------
//! - Weights are grams, mortality rates per year; optimization happens on
//!   the dimensionless transformed scale `ln(natural / scale)`.
//! - Fishing mortality acts through the commercial gear; the fleet choice
//!   only selects the observation filter.
//!
//! Downstream usage
//! ----------------
//! - Typical flow: bundle observations in [`WeightData`], pick the free
//!   parameter names, and call the estimation layer, which merges θ over a
//!   fixed [`ParamSet`], builds a [`DensityCurve`] per evaluation, and
//!   maximizes the summed log-density.
//! - `simulate::simulate_weights` closes the loop for consistency checks:
//!   draw from a known parameter set, re-estimate, compare.
//!
//! Testing notes
//! -------------
//! - Unit tests live with their modules: container and validator behavior
//!   in [`core`], normalization / physics / Fmsy in [`density`], seeded
//!   reproducibility in [`simulate`]. End-to-end recovery is exercised by
//!   the integration tests.

pub mod core;
pub mod density;
pub mod errors;
pub mod simulate;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    AssessOptions, Fleet, FitOptions, ParamSet, WeightClasses, WeightData, WeightObs,
};
pub use self::density::{DensityCurve, SpectrumModel};
pub use self::errors::{ParamError, ParamResult, SpectrumError, SpectrumResult};
pub use self::simulate::simulate_weights;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::spectrum::prelude::*;
//
// to import the main spectrum surface in a single line.

pub mod prelude {
    pub use super::{
        AssessOptions, DensityCurve, Fleet, FitOptions, ParamError, ParamResult, ParamSet,
        SpectrumError, SpectrumModel, SpectrumResult, WeightClasses, WeightData, WeightObs,
        simulate_weights,
    };
}
