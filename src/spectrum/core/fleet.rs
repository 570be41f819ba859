//! Sampling fleet selection.
//!
//! Purpose
//! -------
//! Name the gear that produced a weight-frequency sample. The fleet
//! decides which selectivity curve filters the underlying spectrum into
//! the observed density: trawl-like survey gear retains fish well below
//! the commercial retention midpoint, so the two produce very different
//! observed size distributions from the same stock.
//!
//! Downstream usage
//! ----------------
//! - [`crate::spectrum::density::DensityCurve::build`] picks the
//!   selectivity midpoint from the fleet.
//! - Assessment options carry a fleet so batch runs can be configured
//!   from strings.
use std::str::FromStr;

use crate::spectrum::errors::SpectrumError;

/// Gear that produced a weight-frequency sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fleet {
    /// Scientific survey gear: retains fish from a small fraction of the
    /// asymptotic weight upward.
    Survey,
    /// Commercial gear: retention midpoint at the estimated `Wfs`.
    #[default]
    Commercial,
}

impl Fleet {
    /// Canonical lowercase name of the fleet.
    pub fn as_str(&self) -> &'static str {
        match self {
            Fleet::Survey => "survey",
            Fleet::Commercial => "commercial",
        }
    }
}

impl FromStr for Fleet {
    type Err = SpectrumError;

    /// Parse a fleet name, case-insensitively.
    ///
    /// # Errors
    /// [`SpectrumError::UnknownFleet`] for anything other than
    /// `"survey"` or `"commercial"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "survey" => Ok(Fleet::Survey),
            "commercial" => Ok(Fleet::Commercial),
            _ => Err(SpectrumError::UnknownFleet { name: s.to_string() }),
        }
    }
}
