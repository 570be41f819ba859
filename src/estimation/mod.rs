//! estimation — fits and batch assessments over the size spectrum.
//!
//! Purpose
//! -------
//! Turn weight-frequency observations into parameter estimates. The
//! module stacks three layers:
//! - [`objective`]: log-likelihood objects over the spectrum density,
//!   single-source and pooled, implementing the optimizer's
//!   `LogLikelihood` trait.
//! - [`estimator`]: the single-fit drivers [`estimate`] and
//!   [`estimate_pooled`] — bounded L-BFGS on the log scale plus
//!   curvature-based standard errors and natural-scale intervals,
//!   packaged in [`results`].
//! - [`assessment`]: the batch driver [`assess`], which runs many
//!   datasets, optionally resamples the physiological-mortality
//!   coefficient, and reduces the repeats to quantile tables.
//!
//! Key behaviors
//! -------------
//! - Parameters travel through the optimizer on a log scale; all
//!   user-facing values are natural-scale grams and per-year rates.
//! - Non-convergence and inference failures degrade (warnings, missing
//!   cells); only invalid inputs and a dead optimizer error out.
//! - Batch failures are isolated per dataset and per repeat.
//!
//! Downstream usage
//! ----------------
//! - This is the crate's main entry surface; `lib.rs` re-exports it.

pub mod assessment;
pub mod estimator;
pub mod objective;
pub mod results;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::assessment::{
    Assessment, MleEstimator, PointEstimator, QUANTITY_NAMES, QuantileTable, SummaryRow, assess,
};
pub use self::estimator::{estimate, estimate_pooled};
pub use self::objective::{PooledLikelihood, PooledObs, SpectrumLikelihood};
pub use self::results::{CiTable, EstimationResult, FitCall, FitSource};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sizefreq::estimation::prelude::*;
//
// to import the estimation surface in a single line.

pub mod prelude {
    pub use super::assessment::{
        Assessment, MleEstimator, PointEstimator, QuantileTable, SummaryRow, assess,
    };
    pub use super::estimator::{estimate, estimate_pooled};
    pub use super::results::{CiTable, EstimationResult, FitCall, FitSource};
}
