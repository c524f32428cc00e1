use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_joint_range_deg() -> JointRangeDeg {
    JointRangeDeg {
        min: -180.0,
        max: 180.0,
    }
}
const fn default_approx_min_radius() -> f64 {
    0.0
}
fn default_name() -> String {
    "leg".into()
}

// ---------------------------------------------------------------------------
// SegmentLengths
// ---------------------------------------------------------------------------

/// Coxa, femur and tibia segment lengths (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLengths {
    pub coxa: f64,
    pub femur: f64,
    pub tibia: f64,
}

impl SegmentLengths {
    pub const fn new(coxa: f64, femur: f64, tibia: f64) -> Self {
        Self { coxa, femur, tibia }
    }

    /// Femur plus tibia: the reach of the two-link sub-chain.
    pub fn sub_chain(&self) -> f64 {
        self.femur + self.tibia
    }

    /// Total length from the leg base to the fully extended foot.
    pub fn total(&self) -> f64 {
        self.coxa + self.femur + self.tibia
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("coxa_length", self.coxa),
            ("femur_length", self.femur),
            ("tibia_length", self.tibia),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveLength { field, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JointRange
// ---------------------------------------------------------------------------

/// Closed angular interval `[min, max]` for one joint (rad).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointRange {
    pub min: f64,
    pub max: f64,
}

impl JointRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn from_degrees(min: f64, max: f64) -> Self {
        Self {
            min: min.to_radians(),
            max: max.to_radians(),
        }
    }

    /// `min <= angle <= max`.
    pub fn contains(&self, angle: f64) -> bool {
        self.min <= angle && angle <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn validate(&self, joint: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFinite(joint));
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                joint,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LegGeometry
// ---------------------------------------------------------------------------

/// Validated, immutable description of one three-joint leg.
///
/// Every instance upholds:
/// - all segment lengths finite and `> 0`
/// - every joint range finite with `min <= max`
/// - `torque_max > 0`
/// - `approx_min_radius >= 0`
///
/// Overrides (`with_*`) return a new validated value and leave `self`
/// unchanged.
///
/// Serialized through [`LegGeometryConfig`], so profiles carry degrees and
/// deserializing an invalid profile fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LegGeometryConfig", into = "LegGeometryConfig")]
pub struct LegGeometry {
    name: String,
    segments: SegmentLengths,
    theta1: JointRange,
    theta2: JointRange,
    theta3: JointRange,
    torque_max: f64,
    approx_min_radius: f64,
}

impl LegGeometry {
    /// Build and validate a geometry. Angles are radians.
    pub fn new(
        segments: SegmentLengths,
        theta1: JointRange,
        theta2: JointRange,
        theta3: JointRange,
        torque_max: f64,
        approx_min_radius: f64,
    ) -> Result<Self, ConfigError> {
        let geometry = Self {
            name: default_name(),
            segments,
            theta1,
            theta2,
            theta3,
            torque_max,
            approx_min_radius,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Label used in logs and CLI output.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Copy with a different stall torque limit (N·mm).
    pub fn with_torque_max(&self, torque_max: f64) -> Result<Self, ConfigError> {
        let geometry = Self {
            torque_max,
            ..self.clone()
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Copy with a different minimum reach radius (mm).
    pub fn with_approx_min_radius(&self, radius: f64) -> Result<Self, ConfigError> {
        let geometry = Self {
            approx_min_radius: radius,
            ..self.clone()
        };
        geometry.validate()?;
        Ok(geometry)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.segments.validate()?;
        self.theta1.validate("theta1")?;
        self.theta2.validate("theta2")?;
        self.theta3.validate("theta3")?;
        if !self.torque_max.is_finite() {
            return Err(ConfigError::NonFinite("torque_max"));
        }
        if self.torque_max <= 0.0 {
            return Err(ConfigError::NonPositiveTorque(self.torque_max));
        }
        if !self.approx_min_radius.is_finite() {
            return Err(ConfigError::NonFinite("approx_min_radius"));
        }
        if self.approx_min_radius < 0.0 {
            return Err(ConfigError::NegativeMinRadius(self.approx_min_radius));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn segments(&self) -> &SegmentLengths {
        &self.segments
    }

    pub const fn coxa_length(&self) -> f64 {
        self.segments.coxa
    }

    pub const fn femur_length(&self) -> f64 {
        self.segments.femur
    }

    pub const fn tibia_length(&self) -> f64 {
        self.segments.tibia
    }

    pub const fn theta1_range(&self) -> JointRange {
        self.theta1
    }

    pub const fn theta2_range(&self) -> JointRange {
        self.theta2
    }

    pub const fn theta3_range(&self) -> JointRange {
        self.theta3
    }

    /// Stall torque limit shared by the femur and tibia joints (N·mm).
    pub const fn torque_max(&self) -> f64 {
        self.torque_max
    }

    pub const fn approx_min_radius(&self) -> f64 {
        self.approx_min_radius
    }

    /// Parse a TOML profile (degrees) and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LegGeometryConfig = toml::from_str(content)?;
        Self::try_from(config)
    }

    /// Load a TOML profile from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

// ---------------------------------------------------------------------------
// LegGeometryConfig
// ---------------------------------------------------------------------------

/// Joint range as written in a profile (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointRangeDeg {
    pub min: f64,
    pub max: f64,
}

impl From<JointRangeDeg> for JointRange {
    fn from(r: JointRangeDeg) -> Self {
        Self::from_degrees(r.min, r.max)
    }
}

impl From<JointRange> for JointRangeDeg {
    fn from(r: JointRange) -> Self {
        Self {
            min: r.min.to_degrees(),
            max: r.max.to_degrees(),
        }
    }
}

/// On-disk leg profile. Lengths in mm, angles in degrees, torque in N·mm.
///
/// ```toml
/// name = "phantomx-mk2"
/// coxa_length = 52.0
/// femur_length = 66.0
/// tibia_length = 130.0
/// torque_max = 1800.0
/// approx_min_radius = 140.0
///
/// [theta2]
/// min = -105.0
/// max = 99.0
/// ```
///
/// Omitted joint ranges default to a full turn, an omitted minimum radius
/// to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegGeometryConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub coxa_length: f64,
    pub femur_length: f64,
    pub tibia_length: f64,
    pub torque_max: f64,
    #[serde(default = "default_approx_min_radius")]
    pub approx_min_radius: f64,
    // Tables last so the struct serializes as valid TOML.
    #[serde(default = "default_joint_range_deg")]
    pub theta1: JointRangeDeg,
    #[serde(default = "default_joint_range_deg")]
    pub theta2: JointRangeDeg,
    #[serde(default = "default_joint_range_deg")]
    pub theta3: JointRangeDeg,
}

impl TryFrom<LegGeometryConfig> for LegGeometry {
    type Error = ConfigError;

    fn try_from(config: LegGeometryConfig) -> Result<Self, Self::Error> {
        let geometry = Self::new(
            SegmentLengths::new(config.coxa_length, config.femur_length, config.tibia_length),
            config.theta1.into(),
            config.theta2.into(),
            config.theta3.into(),
            config.torque_max,
            config.approx_min_radius,
        )?;
        Ok(geometry.with_name(config.name))
    }
}

impl From<LegGeometry> for LegGeometryConfig {
    fn from(g: LegGeometry) -> Self {
        Self {
            name: g.name,
            coxa_length: g.segments.coxa,
            femur_length: g.segments.femur,
            tibia_length: g.segments.tibia,
            torque_max: g.torque_max,
            approx_min_radius: g.approx_min_radius,
            theta1: g.theta1.into(),
            theta2: g.theta2.into(),
            theta3: g.theta3.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
