//! Parameter registry and log-scale parameter sets.
//!
//! Purpose
//! -------
//! Provide the **model-space** parameter container [`ParamSet`] for the
//! size-spectrum model, together with the fixed registry of parameter
//! names and characteristic scales that defines the transform between
//! natural values and the optimizer space.
//!
//! Key behaviors
//! -------------
//! - Maintain a fixed registry of the four spectrum parameters:
//!   asymptotic weight `Winf`, fishing mortality `Fm`, retention
//!   midpoint `Wfs`, and physiological mortality `a`, each with a
//!   characteristic scale.
//! - Map between natural values and the dimensionless **transformed**
//!   scale used by the optimizer: `t = ln(value / scale)` and
//!   `value = scale * exp(t)`. The transform guarantees positivity of
//!   every natural parameter for any finite `t`.
//! - Build a set from parallel name/value vectors on either scale via
//!   [`ParamSet::build`]; unnamed parameters keep their registry defaults.
//! - Overlay a free-parameter vector `θ` (transformed scale) onto a base
//!   set via [`ParamSet::merged`], the hot path of likelihood evaluation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Transformed values are finite; constructors and setters validate
//!   inputs, so accessors can recover natural values infallibly.
//! - Natural values are strictly positive by construction of the
//!   transform.
//! - The registry order is the canonical ordering used whenever free
//!   parameters are packed into a `θ` vector.
//!
//! Conventions
//! -----------
//! - Parameter names are matched exactly (`"Winf"`, `"Fm"`, `"Wfs"`,
//!   `"a"`); unknown names surface as [`ParamError::UnknownParameter`].
//! - The registry scales double as the default natural values, so
//!   [`ParamSet::default`] is the zero vector on the transformed scale.
//!
//! Downstream usage
//! ----------------
//! - The estimation layer builds a base `ParamSet` from fit options,
//!   overlays `θ` via `merged` inside the likelihood, and recovers
//!   natural estimates from the fitted `θ̂`.
//! - The density layer reads natural values through the typed accessors
//!   (`winf()`, `fm()`, `wfs()`, `phys_a()`).
//!
//! Testing notes
//! -------------
//! - Unit tests cover the natural↔transformed round trip, the overlay
//!   semantics of `merged`, and rejection of unknown names and
//!   non-positive naturals.
use crate::{
    optimization::bounded_mle::Theta,
    spectrum::errors::{ParamError, ParamResult},
};

/// Canonical parameter names, in registry order.
pub const PARAM_NAMES: [&str; PARAM_COUNT] = [WINF, FM, WFS, PHYS_A];

/// Characteristic scales, in registry order. These double as the default
/// natural values.
pub const PARAM_SCALES: [f64; PARAM_COUNT] = [1000.0, 0.25, 50.0, 0.27];

/// Number of registered parameters.
pub const PARAM_COUNT: usize = 4;

/// Asymptotic weight (g).
pub const WINF: &str = "Winf";
/// Fishing mortality rate (1/yr).
pub const FM: &str = "Fm";
/// Retention midpoint of the commercial gear (g).
pub const WFS: &str = "Wfs";
/// Physiological mortality coefficient (dimensionless).
pub const PHYS_A: &str = "a";

/// Look up the characteristic scale for a parameter name.
///
/// # Errors
/// [`ParamError::UnknownParameter`] when `name` is not registered.
pub fn scale_of(name: &str) -> ParamResult<f64> {
    registry_index(name).map(|i| PARAM_SCALES[i])
}

/// Map a natural value onto the transformed (optimizer) scale.
///
/// `t = ln(value / scale)`, defined only for finite, strictly positive
/// natural values.
///
/// # Errors
/// - [`ParamError::UnknownParameter`] for unregistered names.
/// - [`ParamError::NonFiniteValue`] / [`ParamError::NonPositiveNatural`]
///   for values with no log image.
pub fn natural_to_transformed(name: &str, value: f64) -> ParamResult<f64> {
    let scale = scale_of(name)?;
    if !value.is_finite() {
        return Err(ParamError::NonFiniteValue { name: name.to_string(), value });
    }
    if value <= 0.0 {
        return Err(ParamError::NonPositiveNatural { name: name.to_string(), value });
    }
    Ok((value / scale).ln())
}

/// Map a transformed value back to the natural scale: `scale * exp(t)`.
///
/// # Errors
/// [`ParamError::UnknownParameter`] for unregistered names.
pub fn transformed_to_natural(name: &str, t: f64) -> ParamResult<f64> {
    let scale = scale_of(name)?;
    Ok(scale * t.exp())
}

fn registry_index(name: &str) -> ParamResult<usize> {
    PARAM_NAMES
        .iter()
        .position(|&n| n == name)
        .ok_or_else(|| ParamError::UnknownParameter { name: name.to_string() })
}

/// Complete set of spectrum parameters on the transformed scale.
///
/// Stores one finite transformed value per registered parameter, in
/// registry order. Natural values are always strictly positive, so the
/// density layer never needs to re-validate positivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSet {
    values: [f64; PARAM_COUNT],
}

impl Default for ParamSet {
    /// The registry defaults: every natural value equals its scale, i.e.
    /// the zero vector on the transformed scale.
    fn default() -> Self {
        Self { values: [0.0; PARAM_COUNT] }
    }
}

impl ParamSet {
    /// Build a set from parallel name/value vectors over the registry
    /// defaults.
    ///
    /// With `transformed == false` the values are natural-scale and are
    /// converted via `ln(value / scale)`; with `true` they are stored
    /// as-is. Parameters not named keep their registry defaults.
    ///
    /// # Errors
    /// - [`ParamError::LengthMismatch`] when the vectors disagree.
    /// - [`ParamError::DuplicateName`] when a name appears twice.
    /// - [`ParamError::UnknownParameter`] for unregistered names.
    /// - [`ParamError::NonFiniteValue`] / [`ParamError::NonPositiveNatural`]
    ///   for values with no valid representation.
    pub fn build(names: &[String], values: &[f64], transformed: bool) -> ParamResult<ParamSet> {
        if names.len() != values.len() {
            return Err(ParamError::LengthMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        let mut out = ParamSet::default();
        for (i, (name, &value)) in names.iter().zip(values.iter()).enumerate() {
            if names[..i].contains(name) {
                return Err(ParamError::DuplicateName { name: name.clone() });
            }
            out = if transformed {
                out.with_transformed(name, value)?
            } else {
                out.with_natural(name, value)?
            };
        }
        Ok(out)
    }

    /// Natural value of a parameter by name.
    ///
    /// # Errors
    /// [`ParamError::UnknownParameter`] for unregistered names.
    pub fn natural(&self, name: &str) -> ParamResult<f64> {
        let i = registry_index(name)?;
        Ok(PARAM_SCALES[i] * self.values[i].exp())
    }

    /// Transformed value of a parameter by name.
    ///
    /// # Errors
    /// [`ParamError::UnknownParameter`] for unregistered names.
    pub fn transformed_value(&self, name: &str) -> ParamResult<f64> {
        let i = registry_index(name)?;
        Ok(self.values[i])
    }

    /// Set a parameter from its natural value, returning the updated set.
    ///
    /// # Errors
    /// - [`ParamError::UnknownParameter`] for unregistered names.
    /// - [`ParamError::NonFiniteValue`] / [`ParamError::NonPositiveNatural`]
    ///   for values with no log image.
    pub fn with_natural(mut self, name: &str, value: f64) -> ParamResult<Self> {
        let i = registry_index(name)?;
        self.values[i] = natural_to_transformed(name, value)?;
        Ok(self)
    }

    /// Set a parameter directly on the transformed scale, returning the
    /// updated set.
    ///
    /// # Errors
    /// - [`ParamError::UnknownParameter`] for unregistered names.
    /// - [`ParamError::NonFiniteValue`] for a non-finite transformed value.
    pub fn with_transformed(mut self, name: &str, t: f64) -> ParamResult<Self> {
        let i = registry_index(name)?;
        if !t.is_finite() {
            return Err(ParamError::NonFiniteValue { name: name.to_string(), value: t });
        }
        self.values[i] = t;
        Ok(self)
    }

    /// Overlay a free-parameter vector onto this set.
    ///
    /// `free_names[k]` receives `theta[k]` on the transformed scale; all
    /// other parameters keep their values from `self`. This is the hot
    /// path of likelihood evaluation, called once per objective
    /// evaluation.
    ///
    /// # Errors
    /// - [`ParamError::ThetaLengthMismatch`] when `theta.len()` differs
    ///   from `free_names.len()`.
    /// - [`ParamError::InvalidThetaInput`] for non-finite entries.
    /// - [`ParamError::UnknownParameter`] for unregistered names.
    pub fn merged(&self, free_names: &[String], theta: &Theta) -> ParamResult<ParamSet> {
        if theta.len() != free_names.len() {
            return Err(ParamError::ThetaLengthMismatch {
                expected: free_names.len(),
                actual: theta.len(),
            });
        }
        let mut out = *self;
        for (k, (name, &t)) in free_names.iter().zip(theta.iter()).enumerate() {
            if !t.is_finite() {
                return Err(ParamError::InvalidThetaInput { index: k, value: t });
            }
            let i = registry_index(name)?;
            out.values[i] = t;
        }
        Ok(out)
    }

    /// All natural values in registry order (paired with [`PARAM_NAMES`]).
    pub fn all_natural(&self) -> [f64; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for (i, &t) in self.values.iter().enumerate() {
            out[i] = PARAM_SCALES[i] * t.exp();
        }
        out
    }

    // Typed accessors for the density layer. Indices follow PARAM_NAMES.

    /// Asymptotic weight `Winf` (natural scale).
    pub fn winf(&self) -> f64 {
        PARAM_SCALES[0] * self.values[0].exp()
    }

    /// Fishing mortality `Fm` (natural scale).
    pub fn fm(&self) -> f64 {
        PARAM_SCALES[1] * self.values[1].exp()
    }

    /// Retention midpoint `Wfs` (natural scale).
    pub fn wfs(&self) -> f64 {
        PARAM_SCALES[2] * self.values[2].exp()
    }

    /// Physiological mortality coefficient `a` (natural scale).
    pub fn phys_a(&self) -> f64 {
        PARAM_SCALES[3] * self.values[3].exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The natural↔transformed round trip and registry defaults.
    // - Overlay semantics of `merged`.
    // - Rejection of unknown names, non-positive naturals, and bad theta.
    //
    // They intentionally DO NOT cover:
    // - How the estimation layer chooses free names (tested there).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults equal the registry scales, and setting a natural value
    // round-trips through the transform.
    fn defaults_and_round_trip() {
        // Arrange
        let params = ParamSet::default();

        // Assert defaults.
        assert_eq!(params.winf(), 1000.0);
        assert_eq!(params.fm(), 0.25);
        assert_eq!(params.wfs(), 50.0);
        assert_eq!(params.phys_a(), 0.27);
        assert_eq!(params.transformed_value("Fm").unwrap(), 0.0);

        // Act: round trip an off-default value.
        let updated = params.with_natural("Winf", 2500.0).unwrap();

        // Assert
        assert!((updated.natural("Winf").unwrap() - 2500.0).abs() < 1e-9);
        assert!((updated.transformed_value("Winf").unwrap() - (2.5_f64).ln()).abs() < 1e-12);
        // Untouched parameters keep their defaults.
        assert_eq!(updated.fm(), 0.25);
    }

    #[test]
    // Purpose
    // -------
    // `merged` overlays only the named parameters and validates the theta
    // vector shape and finiteness.
    fn merged_overlays_free_names() {
        // Arrange
        let base = ParamSet::default().with_natural("a", 0.2).unwrap();
        let names = vec!["Fm".to_string(), "Winf".to_string()];

        // Act
        let merged = base.merged(&names, &array![0.5, -0.25]).unwrap();

        // Assert: overlaid values land on the right slots.
        assert!((merged.transformed_value("Fm").unwrap() - 0.5).abs() < 1e-15);
        assert!((merged.transformed_value("Winf").unwrap() + 0.25).abs() < 1e-15);
        // Base values survive.
        assert!((merged.phys_a() - 0.2).abs() < 1e-12);
        assert_eq!(merged.wfs(), 50.0);

        // Shape and finiteness checks.
        assert!(matches!(
            base.merged(&names, &array![0.1]),
            Err(ParamError::ThetaLengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            base.merged(&names, &array![0.1, f64::NAN]),
            Err(ParamError::InvalidThetaInput { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `build` fills named slots on the requested scale, leaves the rest at
    // registry defaults, and rejects mismatched or duplicated inputs.
    fn build_from_parallel_vectors() {
        // Arrange
        let names = vec!["Fm".to_string(), "a".to_string()];

        // Act: natural-scale build.
        let natural = ParamSet::build(&names, &[0.3, 0.2], false).unwrap();
        // Act: transformed-scale build stores values verbatim.
        let transformed = ParamSet::build(&names, &[0.5, -0.1], true).unwrap();

        // Assert
        assert!((natural.fm() - 0.3).abs() < 1e-12);
        assert!((natural.phys_a() - 0.2).abs() < 1e-12);
        assert_eq!(natural.winf(), 1000.0);
        assert!((transformed.transformed_value("Fm").unwrap() - 0.5).abs() < 1e-15);
        assert!((transformed.transformed_value("a").unwrap() + 0.1).abs() < 1e-15);

        assert!(matches!(
            ParamSet::build(&names, &[0.3], false),
            Err(ParamError::LengthMismatch { names: 2, values: 1 })
        ));
        let dup = vec!["Fm".to_string(), "Fm".to_string()];
        assert!(matches!(
            ParamSet::build(&dup, &[0.3, 0.4], false),
            Err(ParamError::DuplicateName { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Unknown names and non-positive naturals are rejected with the
    // specific error variants.
    fn rejects_bad_inputs() {
        let params = ParamSet::default();
        assert!(matches!(
            params.natural("Linf"),
            Err(ParamError::UnknownParameter { .. })
        ));
        assert!(matches!(
            params.with_natural("Fm", 0.0),
            Err(ParamError::NonPositiveNatural { .. })
        ));
        assert!(matches!(
            params.with_natural("Fm", f64::INFINITY),
            Err(ParamError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            natural_to_transformed("nope", 1.0),
            Err(ParamError::UnknownParameter { .. })
        ));
    }
}
