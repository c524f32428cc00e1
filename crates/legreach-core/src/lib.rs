//! Core types for the legreach leg workspace engine.
//!
//! Holds the validated [`LegGeometry`] value that every solver is built from,
//! the planar point and joint types shared across crates, the built-in robot
//! presets and the error taxonomy.
//!
//! All lengths are millimetres, all angles radians. Degrees only appear in
//! TOML profiles, where [`LegGeometryConfig`] converts them on load.

pub mod angle;
pub mod config;
pub mod error;
pub mod presets;
pub mod sample;
pub mod types;

pub use config::{JointRange, LegGeometry, LegGeometryConfig, SegmentLengths};
pub use error::{ConfigError, LegreachError, SampleError};
pub use types::{JointAngles, JointPositions, LegPoint};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::angle::{normalize_angle, wrap_angle};
    pub use crate::config::{JointRange, LegGeometry, LegGeometryConfig, SegmentLengths};
    pub use crate::error::{ConfigError, LegreachError, SampleError};
    pub use crate::presets;
    pub use crate::sample::{arange, inclusive_range};
    pub use crate::types::{JointAngles, JointPositions, LegPoint};
}
