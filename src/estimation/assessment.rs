//! Batch assessment driver: many datasets, optional Monte Carlo spread.
//!
//! Purpose
//! -------
//! Run a point-estimate pass over a batch of weight-frequency datasets
//! and, when the physiological-mortality coefficient is treated as
//! uncertain, a Monte Carlo pass that refits each dataset under repeated
//! truncated-normal draws of that coefficient and reduces the repeats to
//! per-dataset quantile tables.
//!
//! Key behaviors
//! -------------
//! - Failures are isolated, never fatal: a dataset (or a single repeat)
//!   whose fit errors out is logged at warn level and contributes a row
//!   of `NaN`s. One malformed dataset cannot sink the batch.
//! - Work is seeded per dataset × repeat task from one base seed, so the
//!   rayon pool and the sequential fallback produce identical draws and
//!   identical tables.
//! - Quantiles use linear interpolation on the finite repeats of each
//!   dataset; a dataset whose repeats all failed keeps an all-`NaN`
//!   column rather than poisoning its neighbors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each quantile table has shape `(probs.len(), n_datasets)` and its
//!   columns are non-decreasing in the probability level.
//! - Summary rows and table columns follow the input dataset order.
//!
//! Conventions
//! -----------
//! - The four reported quantities are fixed, in [`QUANTITY_NAMES`]
//!   order: the fishing-mortality ratio `Fm / Fmsy`, then `Fm`, `Winf`,
//!   `Wfs` on their natural scales.
//!
//! Downstream usage
//! ----------------
//! - Library consumers call [`assess`] with an [`MleEstimator`] (or
//!   their own [`PointEstimator`]) and an [`AssessOptions`].
use ndarray::Array2;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::{
    estimation::estimator::estimate,
    spectrum::{
        core::{
            data::WeightData,
            fleet::Fleet,
            options::{AssessOptions, FitOptions},
            params::{FM, PHYS_A, WFS, WINF},
        },
        density::SpectrumModel,
        errors::{SpectrumError, SpectrumResult},
    },
};

/// Reported quantities, in summary-row and table order.
pub const QUANTITY_NAMES: [&str; 4] = ["FmFmsy", "Fm", "Winf", "Wfs"];

/// Rejection-sampling budget for one truncated-normal draw.
const MAX_DRAW_ATTEMPTS: usize = 1000;

/// One dataset's reduced estimates, `NaN` where estimation failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    /// Fishing mortality over its maximum-sustainable-yield reference.
    pub f_over_fmsy: f64,
    /// Fishing mortality at full selection, per year.
    pub fm: f64,
    /// Asymptotic weight, grams.
    pub winf: f64,
    /// Commercial retention midpoint, grams.
    pub wfs: f64,
}

impl SummaryRow {
    /// All-`NaN` row, the failure marker.
    pub fn missing() -> Self {
        SummaryRow { f_over_fmsy: f64::NAN, fm: f64::NAN, winf: f64::NAN, wfs: f64::NAN }
    }

    /// The four quantities in [`QUANTITY_NAMES`] order.
    pub fn values(&self) -> [f64; 4] {
        [self.f_over_fmsy, self.fm, self.winf, self.wfs]
    }

    /// Whether every cell is missing.
    pub fn is_missing(&self) -> bool {
        self.values().iter().all(|v| v.is_nan())
    }
}

/// One fit reduced to a [`SummaryRow`], at a given physiological
/// coefficient.
///
/// The driver treats an `Err` as "this repeat produced nothing": it logs
/// and substitutes a missing row. Implementations should therefore
/// return errors for genuine failures rather than smuggling `NaN`s.
pub trait PointEstimator {
    fn estimate_once(&self, data: &WeightData, phys_a: f64) -> SpectrumResult<SummaryRow>;
}

/// The standard estimator: a bounded maximum-likelihood fit followed by
/// the maximum-sustainable-yield reference point.
///
/// Fields:
/// - `free_names` — parameters estimated per fit; defaults to the usual
///   asymptotic weight, fishing mortality, and retention triplet.
/// - `fleet` — gear that produced every dataset.
/// - `fit` — per-fit configuration. Its fixed physiological coefficient
///   is overwritten by the driver-supplied draw on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct MleEstimator {
    pub free_names: Vec<String>,
    pub fleet: Fleet,
    pub fit: FitOptions,
}

impl MleEstimator {
    /// Estimator for the given gear with the default free triplet.
    pub fn new(fleet: Fleet, fit: FitOptions) -> Self {
        MleEstimator {
            free_names: vec![WINF.to_string(), FM.to_string(), WFS.to_string()],
            fleet,
            fit,
        }
    }
}

impl Default for MleEstimator {
    fn default() -> Self {
        MleEstimator::new(Fleet::default(), FitOptions::default())
    }
}

impl PointEstimator for MleEstimator {
    fn estimate_once(&self, data: &WeightData, phys_a: f64) -> SpectrumResult<SummaryRow> {
        let mut opts = self.fit.clone();
        opts.fixed = opts.fixed.with_natural(PHYS_A, phys_a)?;
        let fit = estimate(&self.free_names, data, self.fleet, &opts)?;
        let model = SpectrumModel::default();
        let fmsy = model.fmsy(&fit.params)?;
        let fm = fit.params.fm();
        Ok(SummaryRow {
            f_over_fmsy: fm / fmsy,
            fm,
            winf: fit.params.winf(),
            wfs: fit.params.wfs(),
        })
    }
}

/// Quantiles of one quantity across the Monte Carlo repeats.
///
/// `values` has shape `(probs.len(), n_datasets)`; column `j` belongs to
/// dataset `j` in input order, and runs non-decreasing down the column.
/// A dataset whose repeats all failed keeps an all-`NaN` column.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    pub quantity: &'static str,
    pub probs: Vec<f64>,
    pub values: Array2<f64>,
}

impl QuantileTable {
    /// Number of dataset columns.
    pub fn n_datasets(&self) -> usize {
        self.values.ncols()
    }
}

/// Result of a batch run.
///
/// `summary[j]` is dataset `j`'s point estimate at the mean
/// physiological coefficient. `quantiles` is present only when the
/// Monte Carlo pass ran (`phys_sd > 0`), one table per quantity in
/// [`QUANTITY_NAMES`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub names: Vec<String>,
    pub summary: Vec<SummaryRow>,
    pub quantiles: Option<Vec<QuantileTable>>,
}

/// Assess a batch of datasets.
///
/// Runs the point-estimate pass at `opts.phys_mean`, then, when
/// `opts.phys_sd > 0`, the Monte Carlo pass with `opts.nsample` repeats
/// per dataset and reduces the repeats to quantile tables at
/// `opts.probs`.
///
/// # Errors
/// - [`SpectrumError::NoDatasets`] on an empty batch.
/// - Validation failures of `opts`.
///
/// Per-dataset and per-repeat fit failures are logged and reported as
/// missing values, never as errors.
pub fn assess<E: PointEstimator + Sync>(
    datasets: &[(String, WeightData)], estimator: &E, opts: &AssessOptions,
) -> SpectrumResult<Assessment> {
    opts.validate()?;
    if datasets.is_empty() {
        return Err(SpectrumError::NoDatasets);
    }

    let summary = run_point_pass(datasets, estimator, opts);
    let quantiles = if opts.phys_sd > 0.0 {
        let rows = run_mc_pass(datasets, estimator, opts);
        Some(build_quantile_tables(&rows, datasets.len(), opts))
    } else {
        None
    };

    Ok(Assessment {
        names: datasets.iter().map(|(name, _)| name.clone()).collect(),
        summary,
        quantiles,
    })
}

/// One point estimate per dataset at the mean physiological coefficient.
fn run_point_pass<E: PointEstimator + Sync>(
    datasets: &[(String, WeightData)], estimator: &E, opts: &AssessOptions,
) -> Vec<SummaryRow> {
    let one = |index: usize| -> SummaryRow {
        let (name, data) = &datasets[index];
        if opts.verbose {
            log::info!("fitting dataset '{name}' ({} of {})", index + 1, datasets.len());
        }
        match estimator.estimate_once(data, opts.phys_mean) {
            Ok(row) => row,
            Err(err) => {
                log::warn!("dataset '{name}': estimation failed ({err}); reporting missing values");
                SummaryRow::missing()
            }
        }
    };
    if opts.use_parallel {
        (0..datasets.len()).into_par_iter().map(one).collect()
    } else {
        (0..datasets.len()).map(one).collect()
    }
}

/// The Monte Carlo pass, flattened to dataset-major task order.
///
/// Task `t` covers dataset `t / nsample`, repeat `t % nsample`, and is
/// seeded with `base_seed + t`, which makes the parallel and sequential
/// paths bit-identical.
fn run_mc_pass<E: PointEstimator + Sync>(
    datasets: &[(String, WeightData)], estimator: &E, opts: &AssessOptions,
) -> Vec<SummaryRow> {
    let n_tasks = datasets.len() * opts.nsample;
    let base_seed: u64 = opts.random_seed.unwrap_or_else(rand::random);
    let one = |task: usize| -> SummaryRow {
        let (name, data) = &datasets[task / opts.nsample];
        let seed = base_seed.wrapping_add(task as u64);
        let outcome = draw_physio(opts.phys_mean, opts.phys_sd, seed)
            .and_then(|a| estimator.estimate_once(data, a));
        match outcome {
            Ok(row) => row,
            Err(err) => {
                log::warn!(
                    "dataset '{name}': resampling repeat failed ({err}); reporting missing values"
                );
                SummaryRow::missing()
            }
        }
    };
    if opts.use_parallel {
        (0..n_tasks).into_par_iter().map(one).collect()
    } else {
        (0..n_tasks).map(one).collect()
    }
}

/// One positive draw of the physiological coefficient.
///
/// Rejection sampling on `N(mean, sd)`; zero and negative draws are
/// retried within [`MAX_DRAW_ATTEMPTS`].
///
/// # Errors
/// - [`SpectrumError::InvalidPhysioSd`] if the distribution cannot be
///   built.
/// - [`SpectrumError::TruncatedDrawExhausted`] when the budget runs out,
///   which only happens with a mean deep below zero relative to `sd`.
fn draw_physio(mean: f64, sd: f64, seed: u64) -> SpectrumResult<f64> {
    let normal =
        Normal::new(mean, sd).map_err(|_| SpectrumError::InvalidPhysioSd { value: sd })?;
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..MAX_DRAW_ATTEMPTS {
        let draw = normal.sample(&mut rng);
        if draw.is_finite() && draw > 0.0 {
            return Ok(draw);
        }
    }
    Err(SpectrumError::TruncatedDrawExhausted { mean, sd })
}

/// Reduce task-ordered Monte Carlo rows to one table per quantity.
fn build_quantile_tables(
    rows: &[SummaryRow], n_datasets: usize, opts: &AssessOptions,
) -> Vec<QuantileTable> {
    QUANTITY_NAMES
        .iter()
        .enumerate()
        .map(|(q, &quantity)| {
            let mut values = Array2::from_elem((opts.probs.len(), n_datasets), f64::NAN);
            for dataset in 0..n_datasets {
                let start = dataset * opts.nsample;
                let mut finite: Vec<f64> = rows[start..start + opts.nsample]
                    .iter()
                    .map(|row| row.values()[q])
                    .filter(|v| v.is_finite())
                    .collect();
                if finite.is_empty() {
                    continue;
                }
                finite.sort_unstable_by(f64::total_cmp);
                for (p, &prob) in opts.probs.iter().enumerate() {
                    values[(p, dataset)] = quantile_sorted(&finite, prob);
                }
            }
            QuantileTable { quantity, probs: opts.probs.clone(), values }
        })
        .collect()
}

/// Linear-interpolation quantile of an ascending sample: `h = (n - 1)p`,
/// interpolating between the bracketing order statistics.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
