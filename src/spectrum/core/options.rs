//! Configuration for single fits and batch assessments.
//!
//! Purpose
//! -------
//! Collect the user-facing knobs of the estimation stack in two option
//! bags: [`FitOptions`] for a single maximum-likelihood fit and
//! [`AssessOptions`] for the batch assessment driver. Both carry
//! field-tested defaults so `..Default::default()` is the normal way to
//! configure a run.
//!
//! Key behaviors
//! -------------
//! - Fields are plain and public; validation is deferred to explicit
//!   `validate` hooks called by the entry points, because the number of
//!   free parameters is only known there.
//! - Start values and bounds are expressed in **scaled-natural** units
//!   (value divided by the parameter's registry scale); the estimator
//!   log-transforms them before the optimizer sees them.
//!
//! Downstream usage
//! ----------------
//! - `estimate`/`estimate_pooled` take a [`FitOptions`].
//! - `assess` takes an [`AssessOptions`]; the per-fit configuration of a
//!   batch lives on the estimator it drives, not here.
use crate::{
    optimization::bounded_mle::MLEOptions,
    spectrum::{
        core::{
            params::ParamSet,
            validation::{
                validate_bounds, validate_conf_level, validate_nsample, validate_physio,
                validate_probs, validate_start,
            },
        },
        errors::SpectrumResult,
    },
};

/// Configuration for a single maximum-likelihood fit.
///
/// Fields:
/// - `start: Option<Vec<f64>>` — start values in scaled-natural units, one
///   per free parameter in order. `None` starts every free parameter at
///   `1.0` (its registry scale). The asymptotic-weight start is always
///   overridden by a data-driven heuristic.
/// - `lower`/`upper: Option<Vec<f64>>` — natural-scale box bounds, one per
///   free parameter. A lower bound ≤ 0 means unbounded below.
/// - `fixed: ParamSet` — values of the parameters *not* being estimated.
/// - `conf_level: f64` — confidence level for the asymptotic intervals.
/// - `mle: MLEOptions` — optimizer configuration passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub start: Option<Vec<f64>>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
    pub fixed: ParamSet,
    pub conf_level: f64,
    pub mle: MLEOptions,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            start: None,
            lower: None,
            upper: None,
            fixed: ParamSet::default(),
            conf_level: 0.95,
            mle: MLEOptions::default(),
        }
    }
}

impl FitOptions {
    /// Check the options against the number of free parameters.
    ///
    /// # Errors
    /// First failure among [`validate_start`], [`validate_bounds`], and
    /// [`validate_conf_level`].
    pub fn validate(&self, n_free: usize) -> SpectrumResult<()> {
        if let Some(start) = &self.start {
            validate_start(start, n_free)?;
        }
        validate_bounds(self.lower.as_deref(), self.upper.as_deref(), n_free)?;
        validate_conf_level(self.conf_level)
    }
}

/// Configuration for a batch assessment run.
///
/// Fields:
/// - `phys_mean: f64` — physiological mortality coefficient `a` used for
///   the point-estimate pass (and as the truncated-normal mean).
/// - `phys_sd: f64` — standard deviation of the `a` draw. Zero disables
///   the Monte Carlo pass; positive enables `nsample` repeats per dataset.
/// - `nsample: usize` — Monte Carlo repeats per dataset.
/// - `probs: Vec<f64>` — quantile levels reported in the CI tables.
/// - `use_parallel: bool` — run repeats/datasets on the rayon pool;
///   `false` falls back to a sequential loop with identical results.
/// - `verbose: bool` — log per-dataset progress at info level. Failures
///   are logged at warn level regardless.
/// - `random_seed: Option<u64>` — base seed for the `a` draws; `None`
///   seeds from entropy. Each dataset × repeat task derives its own
///   offset seed, so parallel and serial runs produce identical draws.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessOptions {
    pub phys_mean: f64,
    pub phys_sd: f64,
    pub nsample: usize,
    pub probs: Vec<f64>,
    pub use_parallel: bool,
    pub verbose: bool,
    pub random_seed: Option<u64>,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            phys_mean: 0.27,
            phys_sd: 0.0,
            nsample: 1000,
            probs: (0..=100).map(|i| f64::from(i) / 100.0).collect(),
            use_parallel: true,
            verbose: false,
            random_seed: None,
        }
    }
}

impl AssessOptions {
    /// Check the assessment-level knobs.
    ///
    /// The per-fit options of a batch are validated by the fit entry
    /// points, which know the free-parameter count.
    ///
    /// # Errors
    /// First failure among [`validate_physio`], [`validate_nsample`], and
    /// [`validate_probs`].
    pub fn validate(&self) -> SpectrumResult<()> {
        validate_physio(self.phys_mean, self.phys_sd)?;
        validate_nsample(self.nsample)?;
        validate_probs(&self.probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::errors::SpectrumError;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Default values of both option bags.
    // - Delegation of the validate hooks to the shared validators.
    //
    // They intentionally DO NOT cover:
    // - The validators themselves (tested in core::validation).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults match the documented values, including the 101-point
    // quantile ladder.
    fn defaults_are_documented_values() {
        let fit = FitOptions::default();
        assert_eq!(fit.conf_level, 0.95);
        assert!(fit.start.is_none() && fit.lower.is_none() && fit.upper.is_none());

        let assess = AssessOptions::default();
        assert_eq!(assess.phys_mean, 0.27);
        assert_eq!(assess.phys_sd, 0.0);
        assert_eq!(assess.nsample, 1000);
        assert_eq!(assess.probs.len(), 101);
        assert_eq!(assess.probs[0], 0.0);
        assert_eq!(assess.probs[100], 1.0);
        assert!(assess.use_parallel);
        assert!(!assess.verbose);
        assert!(assess.random_seed.is_none());
    }

    #[test]
    // Purpose
    // -------
    // The fit hook checks start length, bound shape, and confidence level
    // against the free-parameter count.
    fn fit_validate_delegates() {
        let ok = FitOptions { start: Some(vec![0.3, 1.1]), ..Default::default() };
        assert!(ok.validate(2).is_ok());

        let short_start = FitOptions { start: Some(vec![0.3]), ..Default::default() };
        assert!(matches!(
            short_start.validate(2),
            Err(SpectrumError::StartLengthMismatch { expected: 2, actual: 1 })
        ));

        let bad_level = FitOptions { conf_level: 1.0, ..Default::default() };
        assert!(matches!(
            bad_level.validate(1),
            Err(SpectrumError::InvalidConfLevel { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The assessment hook rejects bad draw configuration and quantile
    // levels.
    fn assess_validate_delegates() {
        assert!(AssessOptions::default().validate().is_ok());

        let bad_sd = AssessOptions { phys_sd: -0.1, ..Default::default() };
        assert!(matches!(bad_sd.validate(), Err(SpectrumError::InvalidPhysioSd { .. })));

        let bad_probs = AssessOptions { probs: vec![0.5, 2.0], ..Default::default() };
        assert!(matches!(
            bad_probs.validate(),
            Err(SpectrumError::InvalidProb { index: 1, .. })
        ));
    }
}
