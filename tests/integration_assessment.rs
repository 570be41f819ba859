//! Integration tests for the estimation and assessment pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: from simulated weight-frequency data,
//!   through bounded maximum-likelihood fitting, to confidence intervals,
//!   pooled fits, and batch assessments with Monte Carlo quantile tables.
//! - Exercise realistic regimes (thousands of simulated fish, the default
//!   parameter registry, both gears) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `spectrum::simulate` + `estimation::estimator`:
//!   - Parameter recovery from simulated data with a known truth.
//!   - Interval ordering and natural-scale asymmetry.
//! - `estimation::estimator::estimate_pooled`:
//!   - Joint survey/commercial fitting, source additivity at the optimum,
//!     and the pooled default bound floors.
//! - `estimation::assessment::assess`:
//!   - Failure isolation across datasets in a batch.
//!   - Monte Carlo quantile tables: shape, ordering, reproducibility.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (parameter
//!   registry, bounds mapping, density grid, optimizer internals) — these
//!   are covered by unit tests.
//! - Exhaustive stress testing over extreme sample sizes and parameter
//!   grids — those belong in targeted performance runs.
use sizefreq::{
    estimation::{
        MleEstimator, assess, estimate, estimate_pooled,
        objective::SpectrumLikelihood,
        results::FitSource,
    },
    optimization::bounded_mle::LogLikelihood,
    spectrum::{
        core::{
            data::WeightData,
            fleet::Fleet,
            options::{AssessOptions, FitOptions},
            params::{FM, ParamSet, WFS, WINF},
        },
        density::SpectrumModel,
        simulate::simulate_weights,
    },
};

/// Purpose
/// -------
/// Build the truth parameter set used by the simulation-based tests: the
/// registry defaults (Winf = 1000 g, Wfs = 50 g, a = 0.27) with fishing
/// mortality overridden.
///
/// Parameters
/// ----------
/// - `fm`: Fishing mortality at full selection, per year; must be
///   strictly positive.
///
/// Returns
/// -------
/// - A `ParamSet` equal to the defaults except for the `Fm` slot.
///
/// Invariants
/// ----------
/// - Panics if `fm` is not a valid natural value; tests treat that as a
///   configuration error, not behavior under test.
fn truth_with_fm(fm: f64) -> ParamSet {
    ParamSet::default()
        .with_natural(FM, fm)
        .expect("with_natural should accept a positive fishing mortality")
}

/// Purpose
/// -------
/// Simulate one seeded dataset from the default model at a given truth.
///
/// Parameters
/// ----------
/// - `truth`: Parameter set the weights are drawn from.
/// - `fleet`: Gear whose selectivity shapes the observed distribution.
/// - `n`: Number of fish; must be `> 0`.
/// - `seed`: RNG seed, fixed per test for reproducibility.
///
/// Returns
/// -------
/// - A `WeightData` bundle wrapping the raw simulated sample.
///
/// Usage
/// -----
/// - Shared by every test that needs observations with a known truth,
///   so that recovery assertions have a well-defined target.
fn simulated_dataset(truth: &ParamSet, fleet: Fleet, n: usize, seed: u64) -> WeightData {
    let model = SpectrumModel::default();
    let weights = simulate_weights(&model, truth, fleet, n, Some(seed))
        .expect("simulate_weights should succeed at the registry defaults");
    WeightData::from_sample(weights)
}

/// The usual free triplet: asymptotic weight, fishing mortality,
/// retention midpoint.
fn free_triplet() -> Vec<String> {
    vec![WINF.to_string(), FM.to_string(), WFS.to_string()]
}

#[test]
// Purpose
// -------
// Verify statistical consistency of the single-source fit: with plenty
// of data simulated at a known fishing mortality and every other
// parameter fixed at truth, a one-free-parameter fit recovers that
// mortality closely.
//
// Given
// -----
// - 10,000 commercial weights simulated at Fm = 0.3 (other parameters at
//   the registry defaults), fixed seed.
// - A fit with `Fm` as the only free parameter and the fixed set equal
//   to the defaults (which are the truth for the remaining slots).
//
// Expect
// ------
// - The fit converges.
// - The estimated Fm lies within ±0.05 of 0.3.
// - The interval, when present, brackets the estimate.
fn single_free_fishing_mortality_recovers_simulated_truth() {
    // Arrange
    let truth = truth_with_fm(0.3);
    let data = simulated_dataset(&truth, Fleet::Commercial, 10_000, 20_240_817);
    let names = vec![FM.to_string()];

    // Act
    let fit = estimate(&names, &data, Fleet::Commercial, &FitOptions::default())
        .expect("estimate should succeed on clean simulated data");

    // Assert
    assert!(fit.converged, "status: {}", fit.status);
    let fm_hat = fit.params.fm();
    assert!(
        (fm_hat - 0.3).abs() <= 0.05,
        "recovered Fm = {fm_hat}, expected within 0.05 of 0.3"
    );
    if let Some((est, lo, hi)) = fit.ci.row(FM) {
        if lo.is_finite() && hi.is_finite() {
            assert!(lo < est && est < hi);
        }
    }
}

#[test]
// Purpose
// -------
// Verify the interval table of a full three-parameter fit: intervals are
// ordered around their estimates and, being back-transformed from a
// symmetric log-scale interval, are right-skewed on the natural scale.
//
// Given
// -----
// - 4,000 commercial weights simulated at the registry defaults.
// - A fit freeing Winf, Fm, and Wfs.
//
// Expect
// ------
// - Standard errors and curvature are present.
// - Every row satisfies `lower < estimate < upper`.
// - Every row's upper gap exceeds its lower gap
//   (`upper - estimate > estimate - lower`).
fn interval_table_is_ordered_and_right_skewed() {
    // Arrange
    let truth = ParamSet::default();
    let data = simulated_dataset(&truth, Fleet::Commercial, 4_000, 7_391);

    // Act
    let fit = estimate(&free_triplet(), &data, Fleet::Commercial, &FitOptions::default())
        .expect("estimate should succeed on clean simulated data");

    // Assert
    assert!(fit.hessian.is_some() && fit.jacobian.is_some());
    let se = fit.std_err.as_ref().expect("standard errors should be available");
    assert_eq!(se.len(), 3);
    assert!(se.iter().all(|v| v.is_finite() && *v > 0.0));
    assert!(fit.has_intervals());
    for k in 0..fit.ci.len() {
        let (est, lo, hi) = (fit.ci.estimate[k], fit.ci.lower[k], fit.ci.upper[k]);
        assert!(lo < est && est < hi, "row {k}: ({lo}, {est}, {hi})");
        assert!(
            hi - est > est - lo,
            "row {k}: natural-scale interval should be right-skewed"
        );
    }
}

#[test]
// Purpose
// -------
// Verify the pooled fit couples both observation sources: it fits end to
// end, records the pooled provenance with its default bound floors, and
// its objective at the optimum equals the sum of the per-source
// objectives evaluated at the same parameters.
//
// Given
// -----
// - 800 survey and 800 commercial weights simulated at the same truth.
// - A pooled fit freeing Winf, Fm, and Wfs with default options.
//
// Expect
// ------
// - Finite natural-scale estimates.
// - `call.source == FitSource::Pooled` and the default pooled lower
//   floors (1e-8, with 1e-4 on the Fm slot).
// - `-neg_loglik` equals the survey-only plus commercial-only
//   log-likelihood values at `theta_hat`.
fn pooled_fit_sums_both_sources() {
    // Arrange
    let truth = truth_with_fm(0.35);
    let survey = simulated_dataset(&truth, Fleet::Survey, 800, 101);
    let commercial = simulated_dataset(&truth, Fleet::Commercial, 800, 202);
    let names = free_triplet();

    // Act
    let fit = estimate_pooled(&names, &survey, &commercial, &FitOptions::default())
        .expect("estimate_pooled should succeed on clean simulated data");

    // Assert: provenance and floors.
    assert_eq!(fit.call.source, FitSource::Pooled);
    assert_eq!(fit.call.lower, vec![1e-8, 1e-4, 1e-8]);
    assert!(fit.params.winf().is_finite() && fit.params.winf() > 0.0);
    assert!(fit.params.fm().is_finite() && fit.params.fm() > 0.0);
    assert!(fit.params.wfs().is_finite() && fit.params.wfs() > 0.0);

    // Assert: additivity of the joint objective at the optimum.
    let survey_lik = SpectrumLikelihood::new(
        SpectrumModel::default(),
        Fleet::Survey,
        names.clone(),
        ParamSet::default(),
    );
    let commercial_lik = SpectrumLikelihood::new(
        SpectrumModel::default(),
        Fleet::Commercial,
        names.clone(),
        ParamSet::default(),
    );
    let survey_obs = survey.observations().expect("survey bundle should extract");
    let commercial_obs = commercial.observations().expect("commercial bundle should extract");
    let parts = survey_lik
        .value(&fit.theta_hat, &survey_obs)
        .expect("survey objective should evaluate at the optimum")
        + commercial_lik
            .value(&fit.theta_hat, &commercial_obs)
            .expect("commercial objective should evaluate at the optimum");
    assert!(
        (parts - (-fit.neg_loglik)).abs() < 1e-6 * (1.0 + parts.abs()),
        "pooled objective should equal the sum of its sources"
    );
}

#[test]
// Purpose
// -------
// Verify failure isolation in the batch driver: one malformed dataset in
// a batch of two produces one missing row and leaves the healthy row
// intact.
//
// Given
// -----
// - Dataset "ok": 600 commercial weights simulated at the defaults.
// - Dataset "empty": a bundle wrapping an empty sample.
// - The standard estimator, no Monte Carlo pass, sequential execution.
//
// Expect
// ------
// - `assess` succeeds with two rows in input order.
// - The "ok" row is fully finite with a positive mortality ratio.
// - The "empty" row is all-missing.
// - No quantile tables (the Monte Carlo pass is disabled).
fn batch_isolates_malformed_dataset() {
    // Arrange
    let truth = ParamSet::default();
    let datasets = vec![
        ("ok".to_string(), simulated_dataset(&truth, Fleet::Commercial, 600, 5)),
        ("empty".to_string(), WeightData::from_sample(Vec::new())),
    ];
    let estimator = MleEstimator::default();
    let opts = AssessOptions { use_parallel: false, ..Default::default() };

    // Act
    let out = assess(&datasets, &estimator, &opts).expect("assess should isolate failures");

    // Assert
    assert_eq!(out.names, vec!["ok", "empty"]);
    assert_eq!(out.summary.len(), 2);
    let ok_row = &out.summary[0];
    assert!(ok_row.values().iter().all(|v| v.is_finite()));
    assert!(ok_row.f_over_fmsy > 0.0);
    assert!(out.summary[1].is_missing());
    assert!(out.quantiles.is_none());
}

#[test]
// Purpose
// -------
// Verify the Monte Carlo quantile tables: with an uncertain
// physiological coefficient, the batch produces one table per quantity
// with the requested probability grid, one column per dataset, and
// non-decreasing values down each surviving column.
//
// Given
// -----
// - Two datasets of 250 commercial weights each, simulated at the
//   defaults.
// - `phys_sd = 0.05`, `nsample = 50`, an 11-level probability grid, a
//   fixed base seed, parallel execution.
//
// Expect
// ------
// - Four tables, each shaped (11, 2).
// - Each column either all-NaN (every repeat failed) or finite and
//   non-decreasing in the probability level.
// - The point-estimate summary rows are present for both datasets.
fn monte_carlo_tables_follow_requested_grid() {
    // Arrange
    let truth = ParamSet::default();
    let datasets = vec![
        ("west".to_string(), simulated_dataset(&truth, Fleet::Commercial, 250, 31)),
        ("east".to_string(), simulated_dataset(&truth, Fleet::Commercial, 250, 32)),
    ];
    let estimator = MleEstimator::default();
    let probs: Vec<f64> = (0..=10).map(|i| f64::from(i) / 10.0).collect();
    let opts = AssessOptions {
        phys_sd: 0.05,
        nsample: 50,
        probs: probs.clone(),
        random_seed: Some(424_242),
        ..Default::default()
    };

    // Act
    let out = assess(&datasets, &estimator, &opts).expect("assess should complete the batch");

    // Assert
    assert_eq!(out.summary.len(), 2);
    let tables = out.quantiles.expect("Monte Carlo pass should produce quantile tables");
    assert_eq!(tables.len(), 4);
    for table in &tables {
        assert_eq!(table.probs, probs);
        assert_eq!(table.values.dim(), (11, 2));
        for dataset in 0..table.n_datasets() {
            let column: Vec<f64> = (0..11).map(|p| table.values[(p, dataset)]).collect();
            if column.iter().all(|v| v.is_nan()) {
                continue;
            }
            assert!(column.iter().all(|v| v.is_finite()));
            for p in 1..column.len() {
                assert!(
                    column[p] >= column[p - 1],
                    "table {} dataset {dataset}: column must be non-decreasing",
                    table.quantity
                );
            }
        }
    }
}

#[test]
// Purpose
// -------
// Verify observation-shape flexibility end to end: collapsing a raw
// sample into an exact class-frequency tally leaves the fitted estimates
// unchanged.
//
// Given
// -----
// - 2,000 commercial weights simulated at the defaults, binned to the
//   nearest ten grams to create repeats, fitted once as a raw sample and
//   once as the equivalent (midpoint, frequency) table.
//
// Expect
// ------
// - Both fits succeed and their natural-scale estimates agree closely.
fn class_table_fit_matches_raw_sample_fit() {
    // Arrange: coarse binning creates genuine repeats to aggregate.
    let truth = ParamSet::default();
    let model = SpectrumModel::default();
    let raw = simulate_weights(&model, &truth, Fleet::Commercial, 2_000, Some(99))
        .expect("simulate_weights should succeed at the registry defaults");
    let binned: Vec<f64> = raw.iter().map(|w| (w / 10.0).round() * 10.0).collect();

    let mut weights: Vec<f64> = Vec::new();
    let mut freqs: Vec<f64> = Vec::new();
    for &w in &binned {
        match weights.iter().position(|&u| u == w) {
            Some(k) => freqs[k] += 1.0,
            None => {
                weights.push(w);
                freqs.push(1.0);
            }
        }
    }

    let sample_data = WeightData::from_sample(binned);
    let class_data = WeightData::from_classes(weights, freqs);
    let names = free_triplet();

    // Act
    let from_sample = estimate(&names, &sample_data, Fleet::Commercial, &FitOptions::default())
        .expect("raw-sample fit should succeed");
    let from_classes = estimate(&names, &class_data, Fleet::Commercial, &FitOptions::default())
        .expect("class-table fit should succeed");

    // Assert
    let a = from_sample.params.all_natural();
    let b = from_classes.params.all_natural();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(
            (x - y).abs() < 1e-3 * (1.0 + x.abs()),
            "sample and class-table fits should agree: {x} vs {y}"
        );
    }
}
