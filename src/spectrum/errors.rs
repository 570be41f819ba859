//! Errors for the size-spectrum stack (data validation, model-constant and
//! fit-configuration checks, assessment options, and estimation failures).
//!
//! This module defines a domain error type, [`SpectrumError`], and a parameter
//! error type, [`ParamError`], used across the estimation pipeline. Both
//! implement `Display`/`Error` and convert into each other where layers meet.
//!
//! ## Conventions
//! - **Indices are 0-based.**
//! - Observed weights must be **strictly positive and finite**; class
//!   frequencies must be **non-negative and finite** with at least one
//!   positive entry.
//! - Optimizer/backend failures are normalized to
//!   [`SpectrumError::EstimationFailed`] with a human-readable status.

/// Crate-wide result alias for spectrum operations that may produce
/// [`SpectrumError`].
pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// Result alias for parameter-construction/validation paths that may produce
/// [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for the size-spectrum estimation stack.
///
/// Covers observation-data validation, model-constant checks, fit and
/// assessment configuration, and estimation failures. Parameter-layer errors
/// are mirrored here so callers see one surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    // ---- Observation data ----
    /// Data bundle carries neither a raw sample nor a weight-class table.
    NoObservations,

    /// Selected observation source is empty.
    EmptySource,

    /// An observed weight is NaN/±inf.
    NonFiniteWeight { index: usize, value: f64 },

    /// An observed weight is ≤ 0 (weights must be strictly positive).
    NonPositiveWeight { index: usize, value: f64 },

    /// Weight and frequency columns differ in length.
    ClassLengthMismatch { weights: usize, freqs: usize },

    /// A class frequency is NaN/±inf.
    NonFiniteFrequency { index: usize, value: f64 },

    /// A class frequency is negative.
    NegativeFrequency { index: usize, value: f64 },

    /// Every class frequency is zero; the likelihood is degenerate.
    ZeroFrequencies,

    // ---- Model constants ----
    /// A structural model constant is out of range.
    InvalidModelConstant { name: &'static str, value: f64, reason: &'static str },

    /// Normalization grid needs enough nodes for trapezoidal integration.
    InvalidGridLen { len: usize },

    /// Asymptotic weight does not leave room above the recruitment weight.
    DegenerateSupport { winf: f64, w_r: f64 },

    // ---- Fit configuration ----
    /// Observation fleet name is not recognized.
    UnknownFleet { name: String },

    /// At least one free parameter name is required.
    NoFreeParameters,

    /// Starting-value vector length must match the free names.
    StartLengthMismatch { expected: usize, actual: usize },

    /// Starting values must be finite and strictly positive (they are
    /// log-transformed before optimization).
    InvalidStart { index: usize, value: f64 },

    /// Bound vector length must match the free names.
    BoundLengthMismatch { expected: usize, actual: usize },

    /// Lower bound exceeds upper bound, or a bound is NaN.
    InvalidBoundPair { index: usize, lower: f64, upper: f64 },

    /// Confidence level must lie strictly inside (0, 1).
    InvalidConfLevel { value: f64 },

    // ---- Assessment options ----
    /// Physiological-mortality mean must be finite and > 0.
    InvalidPhysioMean { value: f64 },

    /// Physiological-mortality standard deviation must be finite and ≥ 0.
    InvalidPhysioSd { value: f64 },

    /// Monte Carlo repeat count must be ≥ 1.
    InvalidNsample { value: usize },

    /// Quantile levels must be finite and within [0, 1].
    InvalidProb { index: usize, value: f64 },

    /// Rejection sampling of the positive physiological draw exhausted its
    /// attempt budget.
    TruncatedDrawExhausted { mean: f64, sd: f64 },

    /// Batch assessment needs at least one dataset.
    NoDatasets,

    // ---- Estimation / optimizer ----
    /// Optimizer or likelihood machinery failed; human-readable status.
    EstimationFailed { status: String },

    // ---- Parameter errors ----
    /// No scale is registered for this parameter name.
    UnknownParameter { name: String },

    /// Natural-scale parameter values must be strictly positive.
    NonPositiveNatural { name: String, value: f64 },

    /// Parameter values must be finite.
    NonFiniteParamValue { name: String, value: f64 },

    /// Name and value vectors differ in length.
    ParamLengthMismatch { names: usize, values: usize },

    /// Free transformed vector length must match the free names.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Transformed parameter inputs must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// A parameter name appears more than once.
    DuplicateParamName { name: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for SpectrumError {}

impl std::fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Observation data ----
            SpectrumError::NoObservations => {
                write!(f, "Data bundle carries neither a raw sample nor a weight-class table.")
            }
            SpectrumError::EmptySource => {
                write!(f, "Selected observation source is empty.")
            }
            SpectrumError::NonFiniteWeight { index, value } => {
                write!(f, "Observed weight at index {index} is non-finite: {value}")
            }
            SpectrumError::NonPositiveWeight { index, value } => {
                write!(f, "Observed weight at index {index} is non-positive: {value}")
            }
            SpectrumError::ClassLengthMismatch { weights, freqs } => {
                write!(
                    f,
                    "Weight-class table has {weights} weights but {freqs} frequencies."
                )
            }
            SpectrumError::NonFiniteFrequency { index, value } => {
                write!(f, "Class frequency at index {index} is non-finite: {value}")
            }
            SpectrumError::NegativeFrequency { index, value } => {
                write!(f, "Class frequency at index {index} is negative: {value}")
            }
            SpectrumError::ZeroFrequencies => {
                write!(f, "All class frequencies are zero; nothing to fit.")
            }
            // ---- Model constants ----
            SpectrumError::InvalidModelConstant { name, value, reason } => {
                write!(f, "Model constant '{name}' is invalid ({value}): {reason}")
            }
            SpectrumError::InvalidGridLen { len } => {
                write!(f, "Normalization grid length {len} is too short; need at least 16 nodes.")
            }
            SpectrumError::DegenerateSupport { winf, w_r } => {
                write!(
                    f,
                    "Asymptotic weight {winf} leaves no support above the recruitment weight {w_r}."
                )
            }
            // ---- Fit configuration ----
            SpectrumError::UnknownFleet { name } => {
                write!(f, "Unknown fleet '{name}'; valid options are 'survey' or 'commercial'.")
            }
            SpectrumError::NoFreeParameters => {
                write!(f, "At least one free parameter name is required.")
            }
            SpectrumError::StartLengthMismatch { expected, actual } => {
                write!(f, "Start length mismatch: expected {expected}, got {actual}")
            }
            SpectrumError::InvalidStart { index, value } => {
                write!(
                    f,
                    "Starting value at index {index} must be finite and > 0 (it is log-transformed), got {value}"
                )
            }
            SpectrumError::BoundLengthMismatch { expected, actual } => {
                write!(f, "Bound length mismatch: expected {expected}, got {actual}")
            }
            SpectrumError::InvalidBoundPair { index, lower, upper } => {
                write!(f, "Invalid bounds at index {index}: lower {lower}, upper {upper}")
            }
            SpectrumError::InvalidConfLevel { value } => {
                write!(f, "Confidence level must lie in (0, 1), got {value}")
            }
            // ---- Assessment options ----
            SpectrumError::InvalidPhysioMean { value } => {
                write!(f, "Physiological-mortality mean must be finite and > 0, got {value}")
            }
            SpectrumError::InvalidPhysioSd { value } => {
                write!(f, "Physiological-mortality sd must be finite and >= 0, got {value}")
            }
            SpectrumError::InvalidNsample { value } => {
                write!(f, "Monte Carlo repeat count must be >= 1, got {value}")
            }
            SpectrumError::InvalidProb { index, value } => {
                write!(f, "Quantile level at index {index} must lie in [0, 1], got {value}")
            }
            SpectrumError::TruncatedDrawExhausted { mean, sd } => {
                write!(
                    f,
                    "Could not draw a positive physiological value from N({mean}, {sd}) within the attempt budget."
                )
            }
            SpectrumError::NoDatasets => {
                write!(f, "Batch assessment needs at least one dataset.")
            }
            // ---- Estimation / optimizer ----
            SpectrumError::EstimationFailed { status } => {
                write!(f, "Estimation failed with status: {status}")
            }
            // ---- Parameter errors ----
            SpectrumError::UnknownParameter { name } => {
                write!(f, "No scale registered for parameter '{name}'.")
            }
            SpectrumError::NonPositiveNatural { name, value } => {
                write!(f, "Natural value for '{name}' must be > 0 to log-transform, got {value}")
            }
            SpectrumError::NonFiniteParamValue { name, value } => {
                write!(f, "Value for parameter '{name}' must be finite, got {value}")
            }
            SpectrumError::ParamLengthMismatch { names, values } => {
                write!(f, "Parameter name/value length mismatch: {names} names, {values} values")
            }
            SpectrumError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            SpectrumError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
            SpectrumError::DuplicateParamName { name } => {
                write!(f, "Parameter '{name}' appears more than once.")
            }
            // ---- Fallback ----
            SpectrumError::UnknownError => {
                write!(f, "An unknown error occurred in the spectrum stack.")
            }
        }
    }
}

impl From<ParamError> for SpectrumError {
    fn from(err: ParamError) -> SpectrumError {
        match err {
            ParamError::UnknownParameter { name } => SpectrumError::UnknownParameter { name },
            ParamError::NonPositiveNatural { name, value } => {
                SpectrumError::NonPositiveNatural { name, value }
            }
            ParamError::NonFiniteValue { name, value } => {
                SpectrumError::NonFiniteParamValue { name, value }
            }
            ParamError::LengthMismatch { names, values } => {
                SpectrumError::ParamLengthMismatch { names, values }
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                SpectrumError::ThetaLengthMismatch { expected, actual }
            }
            ParamError::InvalidThetaInput { index, value } => {
                SpectrumError::InvalidThetaInput { index, value }
            }
            ParamError::DuplicateName { name } => SpectrumError::DuplicateParamName { name },
            ParamError::UnknownError => SpectrumError::UnknownError,
        }
    }
}

impl From<crate::optimization::errors::OptError> for SpectrumError {
    /// Normalize optimizer-layer failures into a human-readable estimation
    /// failure; the structured detail survives in the status string.
    fn from(err: crate::optimization::errors::OptError) -> SpectrumError {
        SpectrumError::EstimationFailed { status: err.to_string() }
    }
}

/// Errors specific to the parameter registry and log-scale transforms.
///
/// Typical causes are unregistered names, non-positive natural values (no
/// valid log transform), and name/value shape mismatches.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// No scale is registered for this parameter name.
    UnknownParameter { name: String },

    /// Natural-scale values must be strictly positive to log-transform.
    NonPositiveNatural { name: String, value: f64 },

    /// Parameter values must be finite.
    NonFiniteValue { name: String, value: f64 },

    /// Name and value vectors differ in length.
    LengthMismatch { names: usize, values: usize },

    /// Free transformed vector length must match the free names.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Transformed parameter inputs must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// A parameter name appears more than once.
    DuplicateName { name: String },

    /// ---- Fallback ----
    UnknownError,
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::UnknownParameter { name } => {
                write!(f, "No scale registered for parameter '{name}'.")
            }
            ParamError::NonPositiveNatural { name, value } => {
                write!(f, "Natural value for '{name}' must be > 0 to log-transform, got {value}")
            }
            ParamError::NonFiniteValue { name, value } => {
                write!(f, "Value for parameter '{name}' must be finite, got {value}")
            }
            ParamError::LengthMismatch { names, values } => {
                write!(f, "Parameter name/value length mismatch: {names} names, {values} values")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, got {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta input at index {index} must be finite, got {value}")
            }
            ParamError::DuplicateName { name } => {
                write!(f, "Parameter '{name}' appears more than once.")
            }
            ParamError::UnknownError => {
                write!(f, "An unknown error occurred in parameter validation.")
            }
        }
    }
}
