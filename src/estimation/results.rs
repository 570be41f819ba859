//! Result containers for single maximum-likelihood fits.
//!
//! Purpose
//! -------
//! Define the value types returned by [`estimate`]/[`estimate_pooled`]:
//! the confidence-interval table, the record of the effective call, and
//! the full [`EstimationResult`] bundle.
//!
//! Key behaviors
//! -------------
//! - Missing values are encoded as `NaN`, not as nested `Option`s, so a
//!   fit whose curvature step failed still renders a table of the right
//!   shape with every cell blank.
//! - [`EstimationResult::params`] always holds the merged parameter set
//!   at the optimizer's best point, whether or not the solver converged
//!   and whether or not the interval table survived.
//!
//! Invariants & assumptions
//! ------------------------
//! - `CiTable` columns share one length, one entry per free parameter in
//!   fit order.
//! - Natural-scale intervals come from exponentiating a symmetric
//!   interval on the log scale, so `lower < estimate < upper` holds
//!   whenever the standard error is positive and finite.
//!
//! Downstream usage
//! ----------------
//! - The batch assessment driver reads `params` and `converged` and
//!   discards the rest.
//! - [`crate::estimation::estimator`] is the only producer.
//!
//! [`estimate`]: crate::estimation::estimator::estimate
//! [`estimate_pooled`]: crate::estimation::estimator::estimate_pooled
use crate::{
    optimization::bounded_mle::{FnEvalMap, Grad, Theta, types::Hessian},
    spectrum::{
        core::{fleet::Fleet, params::ParamSet},
        errors::SpectrumResult,
    },
};
use ndarray::Array1;

/// Which observation source(s) a fit consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitSource {
    /// One dataset from a single gear.
    Single(Fleet),
    /// A survey dataset and a commercial dataset under one parameter set.
    Pooled,
}

/// Record of the effective arguments of a fit, after defaults and the
/// data-driven start heuristic have been applied.
///
/// Fields:
/// - `free_names` — estimated parameters, in fit order.
/// - `start` — start values in scaled-natural units, including the
///   asymptotic-weight override.
/// - `lower`/`upper` — natural-scale bounds actually enforced;
///   `-inf`/`+inf` mark an open side.
/// - `fixed` — the parameter set the free slots were merged into, so the
///   non-estimated values are reproducible from the record alone.
/// - `source` — which observation source(s) the fit consumed.
/// - `conf_level` — confidence level of the interval table.
#[derive(Debug, Clone, PartialEq)]
pub struct FitCall {
    pub free_names: Vec<String>,
    pub start: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub fixed: ParamSet,
    pub source: FitSource,
    pub conf_level: f64,
}

/// Per-parameter point estimates and confidence intervals on the natural
/// scale (grams, per-year rates).
///
/// Rows follow the fit's free-parameter order. A `NaN` in `lower`/`upper`
/// marks an unavailable interval; the point estimate is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct CiTable {
    pub names: Vec<String>,
    pub estimate: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub conf_level: f64,
}

impl CiTable {
    /// All-missing table: every cell `NaN`. The surviving point
    /// estimates live in [`EstimationResult::params`], not here.
    pub fn missing(names: Vec<String>, conf_level: f64) -> Self {
        let n = names.len();
        CiTable {
            names,
            estimate: vec![f64::NAN; n],
            lower: vec![f64::NAN; n],
            upper: vec![f64::NAN; n],
            conf_level,
        }
    }

    /// Number of parameter rows.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up one row by parameter name: `(estimate, lower, upper)`.
    pub fn row(&self, name: &str) -> Option<(f64, f64, f64)> {
        let k = self.names.iter().position(|n| n == name)?;
        Some((self.estimate[k], self.lower[k], self.upper[k]))
    }
}

/// Everything a single fit produced.
///
/// Fields:
/// - `params` — full parameter set at the best point (free parameters
///   merged over the fixed ones).
/// - `free_names` — which parameters were estimated, in fit order.
/// - `theta_hat` — best point on the optimizer's log scale.
/// - `neg_loglik` — negative log-likelihood at the best point.
/// - `converged` — `true` only for genuine solver convergence; an
///   exhausted iteration budget leaves this `false`.
/// - `status` — solver termination status, human-readable.
/// - `iterations` — optimizer iterations performed.
/// - `fn_evals` — function-evaluation counters from the backend.
/// - `hessian`/`jacobian` — curvature of the negative log-likelihood at
///   `theta_hat`, when the finite-difference step succeeded.
/// - `std_err` — log-scale standard errors, when the observed
///   information was invertible.
/// - `ci` — natural-scale interval table; missing cells are `NaN`.
/// - `call` — the effective arguments, for reproducibility.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    pub params: ParamSet,
    pub free_names: Vec<String>,
    pub theta_hat: Theta,
    pub neg_loglik: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub hessian: Option<Hessian>,
    pub jacobian: Option<Grad>,
    pub std_err: Option<Array1<f64>>,
    pub ci: CiTable,
    pub call: FitCall,
}

impl EstimationResult {
    /// Natural-scale point estimate of one parameter (free or fixed).
    pub fn estimate_of(&self, name: &str) -> SpectrumResult<f64> {
        Ok(self.params.natural(name)?)
    }

    /// Whether the interval table carries any usable interval.
    pub fn has_intervals(&self) -> bool {
        self.ci.lower.iter().zip(self.ci.upper.iter()).any(|(l, u)| l.is_finite() && u.is_finite())
    }
}
