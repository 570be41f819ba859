//! Validation helpers for observation data and fit configuration.
//!
//! This module centralizes the consistency checks used across the spectrum
//! data and estimation surfaces:
//!
//! - **Raw samples**: [`validate_weights`] enforces finite, strictly
//!   positive individual weights.
//! - **Weight-class tables**: [`validate_classes`] additionally checks
//!   frequency alignment, sign, and that at least one class has mass.
//! - **Fit configuration**: [`validate_free_names`], [`validate_start`],
//!   [`validate_bounds`], and [`validate_conf_level`] check the knobs of a
//!   single fit before any optimizer work starts.
//! - **Assessment configuration**: [`validate_physio`], [`validate_nsample`],
//!   and [`validate_probs`] check the batch-level knobs.
//!
//! All helpers return domain-specific [`SpectrumError`] variants so callers
//! surface the first offending index/value instead of a generic failure.
use crate::spectrum::{
    core::params::scale_of,
    errors::{SpectrumError, SpectrumResult},
};

/// Validate a raw sample of individual weights.
///
/// Weights enter the likelihood through `ln(w)`, so every entry must be
/// finite and strictly positive.
///
/// # Errors
/// - [`SpectrumError::EmptySource`] if the slice is empty.
/// - [`SpectrumError::NonFiniteWeight`] / [`SpectrumError::NonPositiveWeight`]
///   with the first offending index/value.
pub fn validate_weights(weights: &[f64]) -> SpectrumResult<()> {
    if weights.is_empty() {
        return Err(SpectrumError::EmptySource);
    }
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() {
            return Err(SpectrumError::NonFiniteWeight { index, value });
        }
        if value <= 0.0 {
            return Err(SpectrumError::NonPositiveWeight { index, value });
        }
    }
    Ok(())
}

/// Validate a weight-class table (class midpoints + frequencies).
///
/// Frequencies may be fractional (pre-aggregated tables) and individual
/// classes may carry zero mass, but the table as a whole must have some.
///
/// # Errors
/// - [`SpectrumError::ClassLengthMismatch`] when the columns disagree.
/// - Everything [`validate_weights`] reports for the midpoint column.
/// - [`SpectrumError::NonFiniteFrequency`] / [`SpectrumError::NegativeFrequency`]
///   with the first offending index/value.
/// - [`SpectrumError::ZeroFrequencies`] when every frequency is zero.
pub fn validate_classes(weights: &[f64], freqs: &[f64]) -> SpectrumResult<()> {
    if weights.len() != freqs.len() {
        return Err(SpectrumError::ClassLengthMismatch {
            weights: weights.len(),
            freqs: freqs.len(),
        });
    }
    validate_weights(weights)?;
    for (index, &value) in freqs.iter().enumerate() {
        if !value.is_finite() {
            return Err(SpectrumError::NonFiniteFrequency { index, value });
        }
        if value < 0.0 {
            return Err(SpectrumError::NegativeFrequency { index, value });
        }
    }
    if freqs.iter().sum::<f64>() <= 0.0 {
        return Err(SpectrumError::ZeroFrequencies);
    }
    Ok(())
}

/// Validate the list of free parameter names for a fit.
///
/// # Errors
/// - [`SpectrumError::NoFreeParameters`] if the list is empty.
/// - [`SpectrumError::UnknownParameter`] for unregistered names.
/// - [`SpectrumError::DuplicateParamName`] if a name appears twice.
pub fn validate_free_names(names: &[String]) -> SpectrumResult<()> {
    if names.is_empty() {
        return Err(SpectrumError::NoFreeParameters);
    }
    for (i, name) in names.iter().enumerate() {
        scale_of(name)?;
        if names[..i].contains(name) {
            return Err(SpectrumError::DuplicateParamName { name: name.clone() });
        }
    }
    Ok(())
}

/// Validate user-provided start values (scaled-natural units, one per free
/// parameter).
///
/// Start values are log-transformed before the optimizer sees them, so they
/// must be finite and strictly positive.
///
/// # Errors
/// - [`SpectrumError::StartLengthMismatch`] when the length is off.
/// - [`SpectrumError::InvalidStart`] with the first offending index/value.
pub fn validate_start(start: &[f64], expected: usize) -> SpectrumResult<()> {
    if start.len() != expected {
        return Err(SpectrumError::StartLengthMismatch { expected, actual: start.len() });
    }
    for (index, &value) in start.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(SpectrumError::InvalidStart { index, value });
        }
    }
    Ok(())
}

/// Validate optional natural-scale bound vectors for a fit.
///
/// Each bound vector, when present, must match the number of free
/// parameters. A lower bound ≤ 0 is allowed and means "unbounded below"
/// (every natural value is positive anyway); an upper bound must be
/// strictly positive or the feasible set is empty. `NaN` is rejected
/// everywhere, as is a crossed pair.
///
/// # Errors
/// - [`SpectrumError::BoundLengthMismatch`] when a vector's length is off.
/// - [`SpectrumError::InvalidBoundPair`] with the first offending
///   index/lower/upper.
pub fn validate_bounds(
    lower: Option<&[f64]>,
    upper: Option<&[f64]>,
    expected: usize,
) -> SpectrumResult<()> {
    for bound in [lower, upper].into_iter().flatten() {
        if bound.len() != expected {
            return Err(SpectrumError::BoundLengthMismatch {
                expected,
                actual: bound.len(),
            });
        }
    }
    for index in 0..expected {
        let lo = lower.map_or(f64::NEG_INFINITY, |l| l[index]);
        let hi = upper.map_or(f64::INFINITY, |u| u[index]);
        if lo.is_nan() || hi.is_nan() || hi <= 0.0 || lo > hi {
            return Err(SpectrumError::InvalidBoundPair { index, lower: lo, upper: hi });
        }
    }
    Ok(())
}

/// Validate a confidence level.
///
/// # Errors
/// [`SpectrumError::InvalidConfLevel`] unless `0 < level < 1`.
pub fn validate_conf_level(level: f64) -> SpectrumResult<()> {
    if !level.is_finite() || level <= 0.0 || level >= 1.0 {
        return Err(SpectrumError::InvalidConfLevel { value: level });
    }
    Ok(())
}

/// Validate the physiological-mortality draw configuration.
///
/// The mean must be strictly positive (it is a positive biological rate);
/// the standard deviation must be finite and non-negative — zero disables
/// the Monte Carlo pass.
///
/// # Errors
/// [`SpectrumError::InvalidPhysioMean`] / [`SpectrumError::InvalidPhysioSd`].
pub fn validate_physio(mean: f64, sd: f64) -> SpectrumResult<()> {
    if !mean.is_finite() || mean <= 0.0 {
        return Err(SpectrumError::InvalidPhysioMean { value: mean });
    }
    if !sd.is_finite() || sd < 0.0 {
        return Err(SpectrumError::InvalidPhysioSd { value: sd });
    }
    Ok(())
}

/// Validate the Monte Carlo repeat count.
///
/// # Errors
/// [`SpectrumError::InvalidNsample`] when zero.
pub fn validate_nsample(nsample: usize) -> SpectrumResult<()> {
    if nsample == 0 {
        return Err(SpectrumError::InvalidNsample { value: nsample });
    }
    Ok(())
}

/// Validate requested quantile levels.
///
/// # Errors
/// [`SpectrumError::InvalidProb`] for the first entry outside `[0, 1]` or
/// non-finite.
pub fn validate_probs(probs: &[f64]) -> SpectrumResult<()> {
    for (index, &value) in probs.iter().enumerate() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(SpectrumError::InvalidProb { index, value });
        }
    }
    Ok(())
}
