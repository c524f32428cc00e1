use thiserror::Error;

/// Top-level error type for legreach.
#[derive(Debug, Error)]
pub enum LegreachError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sampling error: {0}")]
    Sample(#[from] SampleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Leg geometry and profile errors.
///
/// Raised when a geometry is built or overridden, never during a query.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {field}: {value} (must be > 0)")]
    NonPositiveLength { field: &'static str, value: f64 },

    #[error("Inverted range for {joint}: min={min} > max={max}")]
    InvertedRange {
        joint: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Invalid torque_max: {0} (must be > 0)")]
    NonPositiveTorque(f64),

    #[error("Invalid approx_min_radius: {0} (must be >= 0)")]
    NegativeMinRadius(f64),

    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Errors for sampled sweeps (grid axes, reach bands, range-of-motion traces).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleError {
    #[error("Invalid step: {0} (must be finite and > 0)")]
    InvalidStep(f64),

    #[error("Step {step} is below the minimum of {min}")]
    StepTooSmall { step: f64, min: f64 },

    #[error("Inverted bounds on {axis}: min={min} > max={max}")]
    InvertedBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Empty {0} axis")]
    EmptyAxis(&'static str),

    #[error("Too many samples: {requested} (limit {max})")]
    TooManySamples { requested: f64, max: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
