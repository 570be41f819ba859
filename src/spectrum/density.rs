//! Steady-state size-spectrum density model.
//!
//! Purpose
//! -------
//! Evaluate the equilibrium probability density of individual body weight
//! in a fished population, as seen through a sampling gear. This is the
//! model the likelihood is built on: growth follows a von Bertalanffy-type
//! rate in weight, mortality combines a physiological natural component
//! with gear-selected fishing mortality, and the resulting number density
//! is filtered by the observing fleet's selectivity and normalized to a
//! probability density over the observable support.
//!
//! Key behaviors
//! -------------
//! - [`SpectrumModel`] carries the structural constants (metabolic
//!   exponent, growth constant, selectivity steepnesses, survey retention
//!   ratio, recruitment weight, grid resolution), validated at
//!   construction; `Default` is the field-tested configuration.
//! - [`SpectrumModel::curve`] solves the steady state on a log-spaced
//!   weight grid: cumulative mortality-over-growth hazard by trapezoidal
//!   integration, fleet selectivity applied in log space, and a
//!   log-sum-exp normalizer. The result is a [`DensityCurve`] supporting
//!   cheap point queries.
//! - [`DensityCurve::log_pdf`] interpolates the log-density linearly in
//!   log weight and floors it (inside and outside the support) so line
//!   searches over wild parameters stay finite.
//! - [`SpectrumModel::yield_per_recruit`] and [`SpectrumModel::fmsy`]
//!   evaluate the equilibrium yield curve and locate the fishing mortality
//!   that maximizes it by golden-section search.
//!
//! Invariants & assumptions
//! ------------------------
//! - The observable support is `[w_r, Winf * (1 - GRID_MARGIN)]`; growth
//!   is strictly positive there, so every grid quantity is finite.
//! - Natural parameter values coming from [`ParamSet`] are strictly
//!   positive; the curve additionally rejects values that overflowed to
//!   infinity and supports that collapse below the recruitment weight.
//! - Fishing mortality always acts through the **commercial** gear; the
//!   fleet argument only selects the observation filter.
//!
//! Conventions
//! -----------
//! - Selectivity is logistic in log weight:
//!   `sel(w) = 1 / (1 + (w / w50)^(-u))`, with `w50 = Wfs` for the
//!   commercial gear and `w50 = eta_s * Winf` for the survey gear.
//! - Integrals over weight are evaluated in log-weight space,
//!   `∫ f(w) dw = ∫ f(w) w dln w`, on the uniform log grid.
//!
//! Downstream usage
//! ----------------
//! - The likelihood layer builds one [`DensityCurve`] per objective
//!   evaluation and sums `log_pdf` over the observations.
//! - The batch driver divides estimated fishing mortality by
//!   [`SpectrumModel::fmsy`] for the Fm/Fmsy summary column.
//! - The simulator draws weights from [`DensityCurve::cell_masses`].
//!
//! Testing notes
//! -------------
//! - Unit tests check that cell masses form a probability distribution,
//!   the floor outside the support, the downward shift of observed sizes
//!   under heavier fishing, the survey/commercial observation contrast,
//!   the yield maximum found by `fmsy`, and constant validation.
use ndarray::Array1;

use crate::{
    optimization::numerical_stability::{GRID_MARGIN, PDF_FLOOR, safe_softplus},
    spectrum::{
        core::{
            fleet::Fleet,
            params::{FM, PARAM_NAMES, ParamSet},
        },
        errors::{SpectrumError, SpectrumResult},
    },
};

/// Fishing-mortality bracket searched by [`SpectrumModel::fmsy`] (1/yr).
const FMSY_BRACKET: (f64, f64) = (1e-6, 5.0);

/// Bracket width at which the golden-section search stops.
const FMSY_TOL: f64 = 1e-6;

/// Golden-section step ratio, `(sqrt(5) - 1) / 2`.
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Smallest grid able to resolve the selectivity ramp.
const MIN_GRID_LEN: usize = 16;

/// Structural constants of the steady-state spectrum model.
///
/// Parameters estimated from data (`Winf`, `Fm`, `Wfs`, `a`) live in
/// [`ParamSet`]; everything here is a fixed property of the model variant.
/// Construct via [`SpectrumModel::new`] for validation, or use `Default`.
///
/// Fields:
/// - `exponent` — metabolic exponent `n` of the growth law, in `(0, 1)`.
/// - `growth_const` — growth coefficient `A` in `g^(1-n)/yr`, positive.
/// - `eta_s` — survey retention midpoint as a fraction of `Winf`, in
///   `(0, 1)`.
/// - `u_f`, `u_s` — selectivity steepness of the commercial and survey
///   gear, positive.
/// - `w_r` — recruitment weight (lower end of the support) in grams,
///   positive.
/// - `grid_len` — number of log-spaced grid nodes, at least 16.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumModel {
    pub exponent: f64,
    pub growth_const: f64,
    pub eta_s: f64,
    pub u_f: f64,
    pub u_s: f64,
    pub w_r: f64,
    pub grid_len: usize,
}

impl Default for SpectrumModel {
    fn default() -> Self {
        Self {
            exponent: 0.75,
            growth_const: 4.47,
            eta_s: 1e-3,
            u_f: 10.0,
            u_s: 10.0,
            w_r: 1e-3,
            grid_len: 512,
        }
    }
}

impl SpectrumModel {
    /// Construct a validated model.
    ///
    /// # Errors
    /// - [`SpectrumError::InvalidModelConstant`] naming the first constant
    ///   out of range.
    /// - [`SpectrumError::InvalidGridLen`] when the grid is too coarse for
    ///   trapezoidal integration.
    pub fn new(
        exponent: f64, growth_const: f64, eta_s: f64, u_f: f64, u_s: f64, w_r: f64,
        grid_len: usize,
    ) -> SpectrumResult<Self> {
        if !exponent.is_finite() || exponent <= 0.0 || exponent >= 1.0 {
            return Err(SpectrumError::InvalidModelConstant {
                name: "exponent",
                value: exponent,
                reason: "Metabolic exponent must lie strictly between 0 and 1.",
            });
        }
        if !growth_const.is_finite() || growth_const <= 0.0 {
            return Err(SpectrumError::InvalidModelConstant {
                name: "growth_const",
                value: growth_const,
                reason: "Growth coefficient must be finite and positive.",
            });
        }
        if !eta_s.is_finite() || eta_s <= 0.0 || eta_s >= 1.0 {
            return Err(SpectrumError::InvalidModelConstant {
                name: "eta_s",
                value: eta_s,
                reason: "Survey retention ratio must lie strictly between 0 and 1.",
            });
        }
        for (name, value) in [("u_f", u_f), ("u_s", u_s)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SpectrumError::InvalidModelConstant {
                    name,
                    value,
                    reason: "Selectivity steepness must be finite and positive.",
                });
            }
        }
        if !w_r.is_finite() || w_r <= 0.0 {
            return Err(SpectrumError::InvalidModelConstant {
                name: "w_r",
                value: w_r,
                reason: "Recruitment weight must be finite and positive.",
            });
        }
        if grid_len < MIN_GRID_LEN {
            return Err(SpectrumError::InvalidGridLen { len: grid_len });
        }
        Ok(Self { exponent, growth_const, eta_s, u_f, u_s, w_r, grid_len })
    }

    /// Solve the steady state for one parameter set, filtered by the
    /// observing fleet.
    ///
    /// The returned [`DensityCurve`] is a normalized probability density
    /// of observed weight over `[w_r, Winf * (1 - margin)]`.
    ///
    /// # Errors
    /// - [`SpectrumError::NonFiniteParamValue`] when a natural value
    ///   overflowed the transform.
    /// - [`SpectrumError::DegenerateSupport`] when the support collapses
    ///   below the recruitment weight.
    pub fn curve(&self, params: &ParamSet, fleet: Fleet) -> SpectrumResult<DensityCurve> {
        let naturals = params.all_natural();
        for (name, &value) in PARAM_NAMES.iter().zip(naturals.iter()) {
            if !value.is_finite() {
                return Err(SpectrumError::NonFiniteParamValue {
                    name: (*name).to_string(),
                    value,
                });
            }
        }
        let [winf, fm, wfs, phys_a] = naturals;

        let w_hi = winf * (1.0 - GRID_MARGIN);
        if w_hi <= self.w_r {
            return Err(SpectrumError::DegenerateSupport { winf, w_r: self.w_r });
        }

        let k = self.grid_len;
        let ln_lo = self.w_r.ln();
        let step = (w_hi.ln() - ln_lo) / (k - 1) as f64;
        let ln_w = Array1::from_shape_fn(k, |i| ln_lo + step * i as f64);

        let (w50_obs, u_obs) = match fleet {
            Fleet::Survey => (self.eta_s * winf, self.u_s),
            Fleet::Commercial => (wfs, self.u_f),
        };
        let ln_winf = winf.ln();
        let ln_wfs = wfs.ln();
        let ln_w50_obs = w50_obs.ln();
        let q = 1.0 - self.exponent;

        // Per-node growth, hazard-rate integrand, and observation filter.
        let mut phi = vec![0.0; k];
        let mut ln_growth = vec![0.0; k];
        let mut ln_sel_obs = vec![0.0; k];
        for i in 0..k {
            let lw = ln_w[i];
            let w = lw.exp();
            // Depletion factor 1 - (w/Winf)^(1-n), strictly positive on
            // the open support.
            let deplete = -(q * (lw - ln_winf)).exp_m1();
            let growth = self.growth_const * w.powf(self.exponent) * deplete;
            let sel_fishing = (-safe_softplus(-self.u_f * (lw - ln_wfs))).exp();
            let mortality =
                phys_a * self.growth_const * w.powf(self.exponent - 1.0) + fm * sel_fishing;
            phi[i] = mortality * w / growth;
            ln_growth[i] = growth.ln();
            ln_sel_obs[i] = -safe_softplus(-u_obs * (lw - ln_w50_obs));
        }

        // Cumulative hazard H(w) = ∫ mu/g dw, trapezoidal in ln w.
        let mut hazard = vec![0.0; k];
        for i in 1..k {
            hazard[i] = hazard[i - 1] + 0.5 * (phi[i - 1] + phi[i]) * step;
        }

        // Unnormalized observed log-density: sel_obs * exp(-H) / g.
        let ln_obs = Array1::from_shape_fn(k, |i| ln_sel_obs[i] - hazard[i] - ln_growth[i]);

        // Normalizer Z = ∫ obs dw = ∫ obs * w dln w.
        let weighted = Array1::from_shape_fn(k, |i| ln_obs[i] + ln_w[i]);
        let log_norm = log_trapezoid(&weighted, step);

        Ok(DensityCurve { ln_w, ln_obs, log_norm, step, w_lo: self.w_r, w_hi })
    }

    /// Equilibrium yield per recruit at the parameter set's fishing
    /// mortality: `Y = Fm ∫ sel_f(w) N(w) w dw`.
    ///
    /// # Errors
    /// Propagates [`SpectrumModel::curve`] failures.
    pub fn yield_per_recruit(&self, params: &ParamSet) -> SpectrumResult<f64> {
        let curve = self.curve(params, Fleet::Commercial)?;
        // The commercial curve's unnormalized density is sel_f * N; the
        // biomass integrand adds one more weight factor.
        let integrand = Array1::from_shape_fn(curve.ln_w.len(), |i| {
            curve.ln_obs[i] + 2.0 * curve.ln_w[i]
        });
        let log_flux = log_trapezoid(&integrand, curve.step);
        if log_flux == f64::NEG_INFINITY {
            return Ok(0.0);
        }
        Ok((log_flux + params.fm().ln()).exp())
    }

    /// Fishing mortality at maximum sustainable yield.
    ///
    /// Maximizes [`SpectrumModel::yield_per_recruit`] over `Fm` by
    /// golden-section search on a fixed bracket, holding the other
    /// parameters at their values in `params`.
    ///
    /// # Errors
    /// Propagates curve failures from the yield evaluations.
    pub fn fmsy(&self, params: &ParamSet) -> SpectrumResult<f64> {
        let yield_at = |f: f64| -> SpectrumResult<f64> {
            let scan = params.with_natural(FM, f)?;
            self.yield_per_recruit(&scan)
        };

        let (mut lo, mut hi) = FMSY_BRACKET;
        let mut x1 = hi - INV_PHI * (hi - lo);
        let mut x2 = lo + INV_PHI * (hi - lo);
        let mut y1 = yield_at(x1)?;
        let mut y2 = yield_at(x2)?;
        while hi - lo > FMSY_TOL {
            if y1 < y2 {
                lo = x1;
                x1 = x2;
                y1 = y2;
                x2 = lo + INV_PHI * (hi - lo);
                y2 = yield_at(x2)?;
            } else {
                hi = x2;
                x2 = x1;
                y2 = y1;
                x1 = hi - INV_PHI * (hi - lo);
                y1 = yield_at(x1)?;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

/// Normalized observed-weight density on a log-spaced grid.
///
/// Produced by [`SpectrumModel::curve`]; queries interpolate linearly in
/// log weight. The stored log-density is unnormalized, with the
/// log-normalizer kept separately so the yield integral can reuse the
/// unnormalized spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    ln_w: Array1<f64>,
    ln_obs: Array1<f64>,
    log_norm: f64,
    step: f64,
    w_lo: f64,
    w_hi: f64,
}

impl DensityCurve {
    /// Log probability density at a single weight.
    ///
    /// Outside the support (or for non-finite input) this returns the
    /// constant floor `ln(PDF_FLOOR)`; inside, the interpolated value is
    /// floored at the same constant so the likelihood stays finite even
    /// where the true density underflows.
    pub fn log_pdf(&self, w: f64) -> f64 {
        let floor = PDF_FLOOR.ln();
        if !w.is_finite() || w < self.w_lo || w > self.w_hi {
            return floor;
        }
        let pos = ((w.ln() - self.ln_w[0]) / self.step).max(0.0);
        let i = (pos.floor() as usize).min(self.ln_w.len() - 2);
        let frac = (pos - i as f64).clamp(0.0, 1.0);
        let interp = self.ln_obs[i] * (1.0 - frac) + self.ln_obs[i + 1] * frac;
        (interp - self.log_norm).max(floor)
    }

    /// Support of the density, `(w_lo, w_hi)` in grams.
    pub fn support(&self) -> (f64, f64) {
        (self.w_lo, self.w_hi)
    }

    /// Log-weight grid nodes.
    pub fn ln_grid(&self) -> &Array1<f64> {
        &self.ln_w
    }

    /// Probability mass of each grid cell, in grid order.
    ///
    /// Uses the same trapezoidal rule as the normalizer, so the masses sum
    /// to one up to rounding. This is the basis of the inverse-CDF weight
    /// simulator.
    pub fn cell_masses(&self) -> Vec<f64> {
        let k = self.ln_w.len();
        (0..k - 1)
            .map(|i| {
                let a = (self.ln_obs[i] + self.ln_w[i] - self.log_norm).exp();
                let b = (self.ln_obs[i + 1] + self.ln_w[i + 1] - self.log_norm).exp();
                0.5 * (a + b) * self.step
            })
            .collect()
    }
}

/// Log of a trapezoidal integral of `exp(ln_f)` over a uniform grid,
/// max-shifted so large negative log-values underflow harmlessly.
///
/// Returns `-inf` when every node is `-inf`.
fn log_trapezoid(ln_f: &Array1<f64>, step: f64) -> f64 {
    let m = ln_f.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !m.is_finite() {
        return f64::NEG_INFINITY;
    }
    let mut acc = 0.0;
    for i in 1..ln_f.len() {
        acc += 0.5 * ((ln_f[i - 1] - m).exp() + (ln_f[i] - m).exp()) * step;
    }
    m + acc.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Normalization: cell masses form a probability distribution.
    // - Floor behavior outside the support.
    // - Qualitative physics: heavier fishing shifts observed sizes down;
    //   survey gear sees small fish the commercial gear misses.
    // - The yield maximum located by `fmsy`.
    // - Constant validation in `SpectrumModel::new`.
    //
    // They intentionally DO NOT cover:
    // - Likelihood evaluation over observations (estimation layer tests).
    // -------------------------------------------------------------------------

    fn default_curve(fleet: Fleet) -> DensityCurve {
        SpectrumModel::default()
            .curve(&ParamSet::default(), fleet)
            .expect("default parameters must produce a curve")
    }

    // Mean observed weight under the curve, from the cell masses.
    fn mean_weight(curve: &DensityCurve) -> f64 {
        let masses = curve.cell_masses();
        let grid = curve.ln_grid();
        masses
            .iter()
            .enumerate()
            .map(|(i, &m)| m * (0.5 * (grid[i] + grid[i + 1])).exp())
            .sum()
    }

    // Fraction of observed mass strictly below a weight threshold.
    fn mass_below(curve: &DensityCurve, w: f64) -> f64 {
        let masses = curve.cell_masses();
        let grid = curve.ln_grid();
        masses
            .iter()
            .enumerate()
            .filter(|&(i, _)| (0.5 * (grid[i] + grid[i + 1])).exp() < w)
            .map(|(_, &m)| m)
            .sum()
    }

    #[test]
    // Purpose
    // -------
    // The curve is a probability density: cell masses are non-negative and
    // sum to one, and mid-support queries return a sensible log-density.
    fn cell_masses_form_a_distribution() {
        // Arrange / Act
        let curve = default_curve(Fleet::Commercial);
        let masses = curve.cell_masses();

        // Assert
        assert!(masses.iter().all(|&m| m >= 0.0));
        let total: f64 = masses.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "masses sum to {total}");

        let log_density = curve.log_pdf(80.0);
        assert!(log_density.is_finite());
        assert!(log_density > PDF_FLOOR.ln());
    }

    #[test]
    // Purpose
    // -------
    // Outside the support the log-density is exactly the floor constant,
    // for both tails and for non-finite queries.
    fn log_pdf_floors_outside_support() {
        let curve = default_curve(Fleet::Commercial);
        let (w_lo, w_hi) = curve.support();
        let floor = PDF_FLOOR.ln();

        assert_eq!(curve.log_pdf(0.5 * w_lo), floor);
        assert_eq!(curve.log_pdf(2.0 * w_hi), floor);
        assert_eq!(curve.log_pdf(f64::NAN), floor);
        assert_eq!(curve.log_pdf(f64::INFINITY), floor);
    }

    #[test]
    // Purpose
    // -------
    // Heavier fishing removes large fish faster, so the mean observed
    // weight drops as Fm rises.
    //
    // Given
    // -----
    // - Two commercial curves differing only in Fm (0.12 vs 1.2).
    //
    // Expect
    // ------
    // - Mean observed weight under Fm = 1.2 is strictly below the mean
    //   under Fm = 0.12.
    fn higher_fishing_mortality_shifts_mass_downward() {
        let model = SpectrumModel::default();
        let light = ParamSet::default().with_natural("Fm", 0.12).unwrap();
        let heavy = ParamSet::default().with_natural("Fm", 1.2).unwrap();

        let mean_light = mean_weight(&model.curve(&light, Fleet::Commercial).unwrap());
        let mean_heavy = mean_weight(&model.curve(&heavy, Fleet::Commercial).unwrap());

        assert!(
            mean_heavy < mean_light,
            "mean weight: heavy {mean_heavy} vs light {mean_light}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Survey gear retains fish far below the commercial retention size, so
    // the survey curve puts much more mass below Wfs.
    fn survey_curve_sees_small_fish() {
        let wfs = ParamSet::default().wfs();
        let survey_below = mass_below(&default_curve(Fleet::Survey), wfs);
        let commercial_below = mass_below(&default_curve(Fleet::Commercial), wfs);

        assert!(
            survey_below > commercial_below + 0.1,
            "survey {survey_below} vs commercial {commercial_below}"
        );
    }

    #[test]
    // Purpose
    // -------
    // `fmsy` lands on a fishing mortality whose yield beats nearby rates
    // on both sides, and the yield there is positive.
    fn fmsy_maximizes_the_yield_curve() {
        let model = SpectrumModel::default();
        let params = ParamSet::default();

        let f_star = model.fmsy(&params).unwrap();
        assert!(f_star.is_finite());
        assert!(f_star >= FMSY_BRACKET.0 && f_star <= FMSY_BRACKET.1);

        let yield_at = |f: f64| {
            model
                .yield_per_recruit(&params.with_natural("Fm", f).unwrap())
                .unwrap()
        };
        let y_star = yield_at(f_star);
        assert!(y_star > 0.0);
        assert!(y_star >= yield_at(0.5 * f_star) - 1e-9 * y_star);
        assert!(y_star >= yield_at((2.0 * f_star).min(FMSY_BRACKET.1)) - 1e-9 * y_star);
    }

    #[test]
    // Purpose
    // -------
    // A support that collapses below the recruitment weight is rejected
    // with the dedicated error.
    fn degenerate_support_is_an_error() {
        let model = SpectrumModel::default();
        let tiny = ParamSet::default().with_natural("Winf", 8e-4).unwrap();

        assert!(matches!(
            model.curve(&tiny, Fleet::Commercial),
            Err(SpectrumError::DegenerateSupport { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Constant validation names the first offending field; a too-coarse
    // grid gets its own error.
    fn model_constant_validation() {
        assert!(matches!(
            SpectrumModel::new(1.0, 4.47, 1e-3, 10.0, 10.0, 1e-3, 512),
            Err(SpectrumError::InvalidModelConstant { name: "exponent", .. })
        ));
        assert!(matches!(
            SpectrumModel::new(0.75, -1.0, 1e-3, 10.0, 10.0, 1e-3, 512),
            Err(SpectrumError::InvalidModelConstant { name: "growth_const", .. })
        ));
        assert!(matches!(
            SpectrumModel::new(0.75, 4.47, 1.5, 10.0, 10.0, 1e-3, 512),
            Err(SpectrumError::InvalidModelConstant { name: "eta_s", .. })
        ));
        assert!(matches!(
            SpectrumModel::new(0.75, 4.47, 1e-3, 0.0, 10.0, 1e-3, 512),
            Err(SpectrumError::InvalidModelConstant { name: "u_f", .. })
        ));
        assert!(matches!(
            SpectrumModel::new(0.75, 4.47, 1e-3, 10.0, 10.0, 0.0, 512),
            Err(SpectrumError::InvalidModelConstant { name: "w_r", .. })
        ));
        assert!(matches!(
            SpectrumModel::new(0.75, 4.47, 1e-3, 10.0, 10.0, 1e-3, 8),
            Err(SpectrumError::InvalidGridLen { len: 8 })
        ));
        assert!(SpectrumModel::new(0.75, 4.47, 1e-3, 10.0, 10.0, 1e-3, 512).is_ok());
    }
}
