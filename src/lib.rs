//! sizefreq — stock assessment from weight-frequency data.
//!
//! Purpose
//! -------
//! Serve as the crate root for the size-spectrum assessment stack:
//! estimate fishing mortality, asymptotic weight, and gear retention
//! from catch weight frequencies, with asymptotic confidence intervals
//! and a Monte Carlo batch driver for many stocks at once.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules (`spectrum`, `estimation`, `inference`,
//!   `optimization`) as the public crate surface.
//! - [`spectrum`] holds the steady-state size-spectrum model: the
//!   parameter registry and its log-scale transform, observation
//!   bundles, the density curve, simulation, and the
//!   maximum-sustainable-yield reference point.
//! - [`estimation`] drives bounded maximum-likelihood fits over one or
//!   two observation sources and batches them with optional resampling
//!   of the physiological-mortality coefficient.
//! - [`inference`] turns finite-difference curvature at a fitted
//!   optimum into standard errors.
//! - [`optimization`] wraps argmin's L-BFGS as a box-constrained
//!   log-likelihood maximizer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights are grams, rates are per year; every model parameter is
//!   strictly positive on its natural scale.
//! - Optimization happens on a log scale; the mapping lives in the
//!   parameter registry (`spectrum::core::params`) and nowhere else.
//! - Fallible paths return `Result` with domain error enums; batch code
//!   degrades failures to missing values instead of aborting.
//!
//! Conventions
//! -----------
//! - Vectors and matrices are `ndarray`; linear algebra for inference
//!   goes through `nalgebra` at the call site that needs it.
//! - Progress and degradation are reported through the `log` facade;
//!   the library never installs a logger.
//!
//! Downstream usage
//! ----------------
//! - Typical callers use [`estimation::estimate`] for one dataset,
//!   [`estimation::estimate_pooled`] for a survey/commercial pair, and
//!   [`estimation::assess`] for a batch, importing the rest via
//!   [`prelude`].
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; the integration suite under
//!   `tests/` simulates datasets from known parameters and checks
//!   recovery, interval behavior, and batch reductions end to end.

pub mod estimation;
pub mod inference;
pub mod optimization;
pub mod spectrum;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::{
    estimation::{
        Assessment, CiTable, EstimationResult, MleEstimator, PointEstimator, QuantileTable,
        SummaryRow, assess, estimate, estimate_pooled,
    },
    spectrum::{
        core::{
            data::WeightData,
            fleet::Fleet,
            options::{AssessOptions, FitOptions},
            params::ParamSet,
        },
        density::SpectrumModel,
        errors::{SpectrumError, SpectrumResult},
        simulate::simulate_weights,
    },
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::prelude::*;
//
// to import the whole user-facing surface in a single line.

pub mod prelude {
    pub use crate::estimation::prelude::*;
    pub use crate::optimization::bounded_mle::prelude::*;
    pub use crate::spectrum::prelude::*;
}
