//! Single-fit drivers: bounded maximum likelihood plus asymptotic CIs.
//!
//! Purpose
//! -------
//! Implement [`estimate`] (one dataset, one gear) and [`estimate_pooled`]
//! (a survey/commercial pair under one parameter set). Both share the
//! same pipeline: map starts and natural-scale bounds onto the log
//! scale, maximize the likelihood with projected L-BFGS, then attach
//! curvature-based standard errors and natural-scale intervals.
//!
//! Key behaviors
//! -------------
//! - The asymptotic-weight start is always data-driven: one gram above
//!   the largest observed fish, whatever the caller passed. Every other
//!   free parameter starts at its registry scale unless overridden.
//! - Natural-scale bounds map onto the optimizer scale as
//!   `ln(bound / scale)`; a lower bound ≤ 0 opens that side.
//! - Non-convergence is a warning, not an error: the best point found is
//!   returned with `converged == false`.
//! - The inference step degrades, never aborts: a failed curvature
//!   computation or a non-invertible information matrix yields missing
//!   standard errors and a blank interval table around intact point
//!   estimates.
//!
//! Invariants & assumptions
//! ------------------------
//! - Free names are validated against the registry before any numeric
//!   work, so `scale_of` cannot fail later in the pipeline.
//! - Interval bounds come from exponentiating a symmetric log-scale
//!   interval, hence `lower < estimate < upper` whenever the standard
//!   error is positive.
//!
//! Downstream usage
//! ----------------
//! - The batch assessment driver calls [`estimate`] once per dataset and
//!   repeat.
//!
//! Testing notes
//! -------------
//! - Unit tests exercise the start/bounds mapping helpers and one small
//!   end-to-end fit; recovery accuracy and interval behavior on larger
//!   samples live in the integration suite.
use ndarray::Array1;

use crate::{
    estimation::{
        objective::{PooledLikelihood, PooledObs, SpectrumLikelihood},
        results::{CiTable, EstimationResult, FitCall, FitSource},
    },
    inference::hessian::{covariance_matrix, critical_z, objective_curvature, standard_errors},
    optimization::bounded_mle::{Bounds, LogLikelihood, Theta, maximize},
    spectrum::{
        core::{
            data::WeightData,
            fleet::Fleet,
            options::FitOptions,
            params::{FM, WINF, scale_of},
            validation::validate_free_names,
        },
        density::SpectrumModel,
        errors::SpectrumResult,
    },
};

/// Natural-scale lower-bound floor applied to every free parameter of a
/// pooled fit when the caller supplies no lower bounds.
const POOLED_FLOOR: f64 = 1e-8;

/// Tighter pooled floor for fishing mortality. Near `Fm = 0` the two
/// gears' curves become nearly indistinguishable and the joint surface
/// flattens into a ridge.
const POOLED_FM_FLOOR: f64 = 1e-4;

/// Fit free parameters to one dataset observed by one gear.
///
/// # Arguments
/// - `names` — free parameters to estimate, in `θ` order.
/// - `data` — the observation bundle (raw sample or class table).
/// - `fleet` — the gear that produced the data.
/// - `opts` — starts, bounds, fixed values, confidence level, optimizer
///   knobs.
///
/// # Errors
/// - Validation failures of `names`, `opts`, or `data`.
/// - [`SpectrumError::EstimationFailed`] when the optimizer itself
///   cannot produce a best point.
///
/// Non-convergence and inference failures do *not* error; see the module
/// docs.
///
/// [`SpectrumError::EstimationFailed`]: crate::spectrum::errors::SpectrumError::EstimationFailed
pub fn estimate(
    names: &[String], data: &WeightData, fleet: Fleet, opts: &FitOptions,
) -> SpectrumResult<EstimationResult> {
    validate_free_names(names)?;
    opts.validate(names.len())?;
    let obs = data.observations()?;
    let max_weight = obs.max_weight();
    let likelihood =
        SpectrumLikelihood::new(SpectrumModel::default(), fleet, names.to_vec(), opts.fixed);
    run_fit(&likelihood, &obs, names, max_weight, None, FitSource::Single(fleet), opts)
}

/// Fit free parameters jointly to a survey dataset and a commercial
/// dataset under one shared parameter set.
///
/// Identical pipeline to [`estimate`], with two differences:
/// - the asymptotic-weight start uses the largest fish across *both*
///   sources, and
/// - when the caller supplies no lower bounds, small positive floors are
///   applied (see [`POOLED_FLOOR`]/[`POOLED_FM_FLOOR`]) to keep the
///   joint surface away from its degenerate ridge.
///
/// # Errors
/// As for [`estimate`], applied to both observation bundles.
pub fn estimate_pooled(
    names: &[String], survey_data: &WeightData, commercial_data: &WeightData, opts: &FitOptions,
) -> SpectrumResult<EstimationResult> {
    validate_free_names(names)?;
    opts.validate(names.len())?;
    let survey = survey_data.observations()?;
    let commercial = commercial_data.observations()?;
    let max_weight = survey.max_weight().max(commercial.max_weight());
    let floors =
        names.iter().map(|n| if n == FM { POOLED_FM_FLOOR } else { POOLED_FLOOR }).collect();
    let likelihood = PooledLikelihood::new(SpectrumModel::default(), names.to_vec(), opts.fixed);
    let data = PooledObs { survey, commercial };
    run_fit(&likelihood, &data, names, max_weight, Some(floors), FitSource::Pooled, opts)
}

/// Shared fit pipeline behind both entry points.
///
/// `default_lower` supplies natural-scale floors used only when the
/// caller gave no lower bounds of their own.
fn run_fit<F: LogLikelihood>(
    likelihood: &F, data: &F::Data, names: &[String], max_weight: f64,
    default_lower: Option<Vec<f64>>, source: FitSource, opts: &FitOptions,
) -> SpectrumResult<EstimationResult> {
    let n_free = names.len();

    let start = effective_start(names, opts.start.as_deref(), max_weight)?;
    let lower_nat = match (&opts.lower, default_lower) {
        (Some(user), _) => user.clone(),
        (None, Some(floors)) => floors,
        (None, None) => vec![f64::NEG_INFINITY; n_free],
    };
    let upper_nat = opts.upper.clone().unwrap_or_else(|| vec![f64::INFINITY; n_free]);

    let bounds = transformed_bounds(names, &lower_nat, &upper_nat)?;
    let theta0 = Theta::from_shape_fn(n_free, |k| start[k].ln());

    let outcome = maximize(likelihood, theta0, data, &bounds, &opts.mle)?;
    if !outcome.converged {
        log::warn!(
            "fit did not converge ({}); reporting the best point found",
            outcome.status
        );
    }
    let params = opts.fixed.merged(names, &outcome.theta_hat)?;

    // Asymptotic inference at the best point. Likelihood failures inside
    // the finite-difference stencil surface as NaN and are caught by the
    // derivative validators.
    let nll = |theta: &Theta| match likelihood.value(theta, data) {
        Ok(value) => -value,
        Err(_) => f64::NAN,
    };
    let mut hessian = None;
    let mut jacobian = None;
    let mut std_err = None;
    let mut ci = CiTable::missing(names.to_vec(), opts.conf_level);
    match objective_curvature(&nll, &outcome.theta_hat) {
        Ok(curvature) => {
            match covariance_matrix(&curvature.hessian).as_ref().and_then(standard_errors) {
                Some(se) => {
                    ci = ci_table(names, &outcome.theta_hat, &se, opts.conf_level)?;
                    std_err = Some(se);
                }
                None => {
                    log::warn!(
                        "observed information is not positive definite; confidence intervals unavailable"
                    );
                }
            }
            hessian = Some(curvature.hessian);
            jacobian = Some(curvature.jacobian);
        }
        Err(err) => {
            log::warn!("curvature at the optimum failed ({err}); confidence intervals unavailable");
        }
    }

    Ok(EstimationResult {
        params,
        free_names: names.to_vec(),
        theta_hat: outcome.theta_hat,
        neg_loglik: -outcome.value,
        converged: outcome.converged,
        status: outcome.status,
        iterations: outcome.iterations,
        fn_evals: outcome.fn_evals,
        hessian,
        jacobian,
        std_err,
        ci,
        call: FitCall {
            free_names: names.to_vec(),
            start,
            lower: lower_nat,
            upper: upper_nat,
            fixed: opts.fixed,
            source,
            conf_level: opts.conf_level,
        },
    })
}

/// Effective scaled-natural start values.
///
/// User values (or `1.0` per slot) with the asymptotic-weight slot
/// overridden to one gram above the largest observed fish, rescaled.
fn effective_start(
    names: &[String], user: Option<&[f64]>, max_weight: f64,
) -> SpectrumResult<Vec<f64>> {
    let mut start = match user {
        Some(values) => values.to_vec(),
        None => vec![1.0; names.len()],
    };
    if let Some(k) = names.iter().position(|n| n == WINF) {
        start[k] = (max_weight + 1.0) / scale_of(WINF)?;
    }
    Ok(start)
}

/// Map natural-scale bounds onto the optimizer's log scale.
///
/// `θ = ln(natural / scale)`, so a bound maps to `ln(bound / scale)`.
/// A lower bound ≤ 0 (unreachable on the natural scale) opens the side;
/// an infinite upper bound stays open.
fn transformed_bounds(
    names: &[String], lower_nat: &[f64], upper_nat: &[f64],
) -> SpectrumResult<Bounds> {
    let n = names.len();
    let mut lower = Array1::from_elem(n, f64::NEG_INFINITY);
    let mut upper = Array1::from_elem(n, f64::INFINITY);
    for (k, name) in names.iter().enumerate() {
        let scale = scale_of(name)?;
        if lower_nat[k] > 0.0 {
            lower[k] = (lower_nat[k] / scale).ln();
        }
        if upper_nat[k].is_finite() {
            upper[k] = (upper_nat[k] / scale).ln();
        }
    }
    Ok(Bounds::new(lower, upper)?)
}

/// Interval table from log-scale standard errors.
///
/// Exponentiating `θ̂ₖ ± z·seₖ` and rescaling gives strictly positive,
/// right-skewed natural-scale intervals.
fn ci_table(
    names: &[String], theta_hat: &Theta, std_err: &Array1<f64>, conf_level: f64,
) -> SpectrumResult<CiTable> {
    let z = critical_z(conf_level)?;
    let n = names.len();
    let mut estimate = Vec::with_capacity(n);
    let mut lower = Vec::with_capacity(n);
    let mut upper = Vec::with_capacity(n);
    for (k, name) in names.iter().enumerate() {
        let scale = scale_of(name)?;
        estimate.push(scale * theta_hat[k].exp());
        lower.push(scale * (theta_hat[k] - z * std_err[k]).exp());
        upper.push(scale * (theta_hat[k] + z * std_err[k]).exp());
    }
    Ok(CiTable { names: names.to_vec(), estimate, lower, upper, conf_level })
}
