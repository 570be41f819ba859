//! Observation containers for weight-frequency data.
//!
//! Purpose
//! -------
//! Provide the containers through which weight observations enter the
//! estimation stack: a lenient bundle ([`WeightData`]) that mirrors how
//! field data arrives (individual weights, a weight-class table, or both),
//! and the validated tagged form ([`WeightObs`]) that the likelihood
//! matches on exhaustively.
//!
//! Key behaviors
//! -------------
//! - [`WeightData`] is a lenient bundle: construction never fails, so
//!   callers can assemble batches of datasets up front and let validation
//!   happen per fit. When both a raw sample and a class table are present,
//!   the table takes precedence.
//! - [`WeightData::observations`] validates the bundle and resolves it
//!   into one [`WeightObs`] variant; there is no third shape, so the
//!   likelihood's match is exhaustive by construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights inside a validated [`WeightObs`] are finite and strictly
//!   positive (they enter the likelihood through `ln(w)`).
//! - Class frequencies are finite, non-negative, possibly fractional, and
//!   sum to a strictly positive total.
//!
//! Conventions
//! -----------
//! - Weights are in grams throughout; class tables are (midpoint,
//!   frequency) pairs with no binning metadata.
//!
//! Downstream usage
//! ----------------
//! - Single-fit entry points call [`WeightData::observations`] once and
//!   hand the resulting [`WeightObs`] to the likelihood.
//! - The batch driver stores one [`WeightData`] per dataset; a malformed
//!   bundle fails at `observations()` inside its own task and is isolated
//!   to a missing row.
//!
//! Testing notes
//! -------------
//! - Unit tests cover precedence between sample and table, validation
//!   failure passthrough, the empty bundle, and the accessors the
//!   estimator relies on (`n_effective`, `max_weight`).
use ndarray::Array1;

use crate::spectrum::{
    core::validation::{validate_classes, validate_weights},
    errors::{SpectrumError, SpectrumResult},
};

/// Weight-class table: class midpoints with observed frequencies.
///
/// A plain column container with no validation of its own; checks happen
/// when the owning [`WeightData`] is resolved into observations.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightClasses {
    /// Class midpoints in grams.
    pub weights: Vec<f64>,
    /// Observed frequency per class; may be fractional when pre-aggregated.
    pub freqs: Vec<f64>,
}

impl WeightClasses {
    /// Pair up midpoint and frequency columns.
    pub fn new(weights: Vec<f64>, freqs: Vec<f64>) -> Self {
        WeightClasses { weights, freqs }
    }
}

/// `WeightData` — lenient observation bundle for one dataset.
///
/// Purpose
/// -------
/// Carry a dataset's raw material in whichever shape it arrived: a vector
/// of individual weights, a weight-class table, or both. Construction is
/// infallible so batches can be assembled without upfront validation;
/// [`WeightData::observations`] is the single validation point.
///
/// Fields
/// ------
/// - `sample`: `Option<Vec<f64>>`
///   Individual fish weights in grams, typically from port or survey
///   sampling.
/// - `classes`: `Option<WeightClasses>`
///   Pre-aggregated weight-class table. Takes precedence over `sample`
///   when both are present.
///
/// Invariants
/// ----------
/// - None at construction time. All numeric invariants are enforced by
///   [`WeightData::observations`].
///
/// Examples
/// --------
/// ```rust
/// # use sizefreq::spectrum::core::data::WeightData;
/// #
/// let data = WeightData::from_sample(vec![120.0, 340.0, 95.5]);
/// let obs = data.observations().unwrap();
/// assert_eq!(obs.len(), 3);
/// assert_eq!(obs.n_effective(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightData {
    /// Individual weights in grams, if available.
    pub sample: Option<Vec<f64>>,
    /// Weight-class table, if available; preferred over `sample`.
    pub classes: Option<WeightClasses>,
}

impl WeightData {
    /// Bundle from a raw sample of individual weights.
    pub fn from_sample(sample: Vec<f64>) -> Self {
        WeightData { sample: Some(sample), classes: None }
    }

    /// Bundle from a weight-class table.
    pub fn from_classes(weights: Vec<f64>, freqs: Vec<f64>) -> Self {
        WeightData { sample: None, classes: Some(WeightClasses::new(weights, freqs)) }
    }

    /// Bundle from both shapes at once; the table takes precedence for
    /// estimation.
    pub fn new(sample: Option<Vec<f64>>, classes: Option<WeightClasses>) -> Self {
        WeightData { sample, classes }
    }

    /// Validate the bundle and resolve it into a [`WeightObs`].
    ///
    /// Resolution order: a class table, when present, wins over a raw
    /// sample; an empty bundle is an error.
    ///
    /// # Errors
    /// - [`SpectrumError::NoObservations`] when neither shape is present.
    /// - Everything [`validate_classes`] / [`validate_weights`] report for
    ///   the chosen shape.
    pub fn observations(&self) -> SpectrumResult<WeightObs> {
        if let Some(classes) = &self.classes {
            validate_classes(&classes.weights, &classes.freqs)?;
            return Ok(WeightObs::Classes(classes.clone()));
        }
        if let Some(sample) = &self.sample {
            validate_weights(sample)?;
            return Ok(WeightObs::Sample(Array1::from_vec(sample.clone())));
        }
        Err(SpectrumError::NoObservations)
    }
}

/// Validated observation source, in the two shapes the likelihood knows.
///
/// Produced only by [`WeightData::observations`], so downstream code can
/// rely on finite, strictly positive weights and (for tables) a positive
/// total frequency. The likelihood matches this enum exhaustively: a raw
/// sample contributes `Σ ln f(wᵢ)`, a class table `Σ freqᵢ · ln f(wᵢ)`.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightObs {
    /// Individual weights, each counting once.
    Sample(Array1<f64>),
    /// Class midpoints weighted by their frequencies.
    Classes(WeightClasses),
}

impl WeightObs {
    /// Number of distinct weight entries (fish or classes).
    pub fn len(&self) -> usize {
        match self {
            WeightObs::Sample(w) => w.len(),
            WeightObs::Classes(c) => c.weights.len(),
        }
    }

    /// Whether the source has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effective number of observations: the sample size, or the sum of
    /// class frequencies.
    pub fn n_effective(&self) -> f64 {
        match self {
            WeightObs::Sample(w) => w.len() as f64,
            WeightObs::Classes(c) => c.freqs.iter().sum(),
        }
    }

    /// Largest weight that carries positive count.
    ///
    /// Used by the estimator to seed the asymptotic-weight start value
    /// just above the largest observed fish. Zero-frequency table cells
    /// are ignored so trailing empty classes do not inflate the start.
    pub fn max_weight(&self) -> f64 {
        match self {
            WeightObs::Sample(w) => w.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            WeightObs::Classes(c) => c
                .weights
                .iter()
                .zip(c.freqs.iter())
                .filter(|&(_, &f)| f > 0.0)
                .map(|(&w, _)| w)
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
