//! Leg geometries of real hexapod robots.

use crate::config::{JointRange, LegGeometry, SegmentLengths};
use crate::error::ConfigError;

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 2] = ["phantomx-mk2", "xr-r1"];

/// Trossen Robotics PhantomX MK2.
///
/// `torque_max` is the AX-12A stall torque (N·mm).
pub fn phantomx_mk2() -> LegGeometry {
    build(
        "phantomx-mk2",
        SegmentLengths::new(52.0, 66.0, 130.0),
        [(-81.0, 81.0), (-105.0, 99.0), (-145.0, 25.5)],
        1800.0,
        140.0,
    )
}

/// XiaoR Geek XR-R1.
pub fn xr_r1() -> LegGeometry {
    build(
        "xr-r1",
        SegmentLengths::new(45.0, 75.0, 140.0),
        [(-90.0, 90.0), (-90.0, 90.0), (-170.0, 0.0)],
        3400.0,
        135.0,
    )
}

/// Look up a preset by name (case-insensitive, `_` and `-` interchangeable).
pub fn by_name(name: &str) -> Result<LegGeometry, ConfigError> {
    match name.to_ascii_lowercase().replace('_', "-").as_str() {
        "phantomx-mk2" | "phantomx" => Ok(phantomx_mk2()),
        "xr-r1" => Ok(xr_r1()),
        _ => Err(ConfigError::UnknownPreset(name.to_owned())),
    }
}

// Preset values are covered by the tests below.
#[allow(clippy::expect_used)]
fn build(
    name: &str,
    segments: SegmentLengths,
    ranges_deg: [(f64, f64); 3],
    torque_max: f64,
    approx_min_radius: f64,
) -> LegGeometry {
    let [t1, t2, t3] = ranges_deg.map(|(min, max)| JointRange::from_degrees(min, max));
    LegGeometry::new(segments, t1, t2, t3, torque_max, approx_min_radius)
        .expect("preset geometry must be valid")
        .with_name(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
