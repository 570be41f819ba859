//! Log-likelihood objectives over the steady-state size spectrum.
//!
//! Purpose
//! -------
//! Bridge the spectrum density to the bounded optimizer: implement the
//! [`LogLikelihood`] trait for a single observation source
//! ([`SpectrumLikelihood`]) and for a survey/commercial pair fitted under
//! one parameter set ([`PooledLikelihood`]).
//!
//! Key behaviors
//! -------------
//! - The optimizer's `θ` covers only the *free* parameters; each
//!   evaluation overlays them onto the fixed set before building the
//!   density curve, so fixing a parameter is exact, not a penalty.
//! - A raw sample contributes `Σ ln f(wᵢ)`; a class table contributes
//!   `Σ freqᵢ · ln f(wᵢ)`, which makes the two shapes agree whenever the
//!   table is an exact tally of the sample.
//! - Out-of-support weights hit the density floor inside
//!   `DensityCurve::log_pdf`, so the objective stays finite and the line
//!   search can back off instead of aborting.
//!
//! Invariants & assumptions
//! ------------------------
//! - `θ.len()` equals the number of free names; `check` enforces this
//!   before the solver starts.
//! - The pooled value is exactly the sum of the two single-source values
//!   at the same `θ`.
//!
//! Downstream usage
//! ----------------
//! - [`crate::estimation::estimator`] drives these through `maximize` and
//!   re-evaluates them for the curvature step.
use crate::{
    optimization::{
        bounded_mle::{Cost, LogLikelihood, Theta},
        errors::{OptError, OptResult},
    },
    spectrum::{
        core::{data::WeightObs, fleet::Fleet, params::ParamSet},
        density::SpectrumModel,
    },
};

/// Log-likelihood of one observation source under one gear's curve.
///
/// Holds everything an evaluation needs except the data itself: the
/// shared model constants, the gear whose selectivity shapes the curve,
/// the names of the free parameters in `θ` order, and the fixed values
/// the free ones are overlaid on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumLikelihood {
    model: SpectrumModel,
    fleet: Fleet,
    free_names: Vec<String>,
    fixed: ParamSet,
}

impl SpectrumLikelihood {
    /// Bundle a model, gear, free-parameter order, and fixed values.
    pub fn new(
        model: SpectrumModel, fleet: Fleet, free_names: Vec<String>, fixed: ParamSet,
    ) -> Self {
        SpectrumLikelihood { model, fleet, free_names, fixed }
    }

    /// Free-parameter names, in `θ` order.
    pub fn free_names(&self) -> &[String] {
        &self.free_names
    }

    /// The gear whose selectivity this likelihood evaluates under.
    pub fn fleet(&self) -> Fleet {
        self.fleet
    }

    /// Full parameter set at `θ`: free values overlaid on the fixed set.
    pub fn params_at(&self, theta: &Theta) -> OptResult<ParamSet> {
        Ok(self.fixed.merged(&self.free_names, theta)?)
    }

    /// Evaluate `ℓ(θ)` against one observation source.
    fn log_likelihood(&self, theta: &Theta, obs: &WeightObs) -> OptResult<Cost> {
        let params = self.params_at(theta)?;
        let curve = self.model.curve(&params, self.fleet)?;
        let ll = match obs {
            WeightObs::Sample(weights) => weights.iter().map(|&w| curve.log_pdf(w)).sum(),
            WeightObs::Classes(classes) => classes
                .weights
                .iter()
                .zip(classes.freqs.iter())
                .map(|(&w, &freq)| freq * curve.log_pdf(w))
                .sum(),
        };
        Ok(ll)
    }

    /// Shape checks shared by the single and pooled `check` hooks.
    fn check_shapes(&self, theta: &Theta, obs: &WeightObs) -> OptResult<()> {
        if theta.len() != self.free_names.len() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.free_names.len(),
                actual: theta.len(),
            });
        }
        if obs.is_empty() {
            return Err(OptError::LikelihoodFailed {
                text: "observation source has no entries".to_string(),
            });
        }
        Ok(())
    }
}

impl LogLikelihood for SpectrumLikelihood {
    type Data = WeightObs;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        self.log_likelihood(theta, data)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.check_shapes(theta, data)
    }
}

/// Survey and commercial observations for one pooled fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PooledObs {
    pub survey: WeightObs,
    pub commercial: WeightObs,
}

/// Joint log-likelihood of a survey source and a commercial source under
/// one shared parameter set.
///
/// The two gears see the same parameters but different selectivity
/// curves; the joint value is the plain sum of the two single-source
/// values, so anything that maximizes the pooled objective trades off
/// both sources at once.
#[derive(Debug, Clone, PartialEq)]
pub struct PooledLikelihood {
    survey: SpectrumLikelihood,
    commercial: SpectrumLikelihood,
}

impl PooledLikelihood {
    /// Build the gear pair from one model, free order, and fixed set.
    pub fn new(model: SpectrumModel, free_names: Vec<String>, fixed: ParamSet) -> Self {
        PooledLikelihood {
            survey: SpectrumLikelihood::new(model.clone(), Fleet::Survey, free_names.clone(), fixed),
            commercial: SpectrumLikelihood::new(model, Fleet::Commercial, free_names, fixed),
        }
    }

    /// Free-parameter names, in `θ` order.
    pub fn free_names(&self) -> &[String] {
        self.survey.free_names()
    }

    /// Full parameter set at `θ`.
    pub fn params_at(&self, theta: &Theta) -> OptResult<ParamSet> {
        self.survey.params_at(theta)
    }
}

impl LogLikelihood for PooledLikelihood {
    type Data = PooledObs;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        let survey = self.survey.value(theta, &data.survey)?;
        let commercial = self.commercial.value(theta, &data.commercial)?;
        Ok(survey + commercial)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.survey.check(theta, &data.survey)?;
        self.commercial.check(theta, &data.commercial)
    }
}
