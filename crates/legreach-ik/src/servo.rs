//! Planar IK in the form used by the leg firmware, with the resulting
//! angles quantised to servo units.
//!
//! Servo angles are in units of 0.29° (1024 steps over 300°), offset around
//! each leg side's mounting centre.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::solver::LegKinematicsSolver;

/// Radians-to-servo-unit scale used by the firmware (`100 / 51 * 100`).
pub const SERVO_UNITS_PER_RAD: f64 = 100.0 / 51.0 * 100.0;

/// Mounting centres of the left-side coxa, femur and tibia servos.
pub const LEFT_CENTRE: [i32; 3] = [512, 500, 670];

/// Mounting centres of the right-side coxa, femur and tibia servos.
pub const RIGHT_CENTRE: [i32; 3] = [512, 524, 354];

/// Firmware-style IK output for a foot at `(x, z)` with the coxa at rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServoTargets {
    /// Coxa, femur and tibia angles (rad).
    pub angles: [f64; 3],
    /// Angles in servo units, truncated toward zero.
    pub servo: [i32; 3],
    /// Commands for a left-side leg (centre minus offset).
    pub left: [i32; 3],
    /// Commands for a right-side leg (centre plus offset).
    pub right: [i32; 3],
}

impl LegKinematicsSolver {
    /// Compute firmware servo targets for the foot at `(x, z)`.
    ///
    /// The femur angle is measured above the horizon and the tibia angle is
    /// offset by a quarter turn. A law-of-cosines term with no real
    /// solution contributes `0` instead of failing, so unreachable targets
    /// still produce commands.
    pub fn servo_targets(&self, x: f64, z: f64) -> ServoTargets {
        let seg = self.geometry().segments();
        let dx = x - seg.coxa;
        let span = dx.hypot(z);

        let elevation = -z.atan2(dx);
        let femur_offset = real_acos(
            (seg.femur.powi(2) - seg.tibia.powi(2) + span.powi(2)) / (2.0 * seg.femur * span),
        )
        .unwrap_or(0.0);
        let tibia = real_acos(
            (seg.femur.powi(2) - span.powi(2) + seg.tibia.powi(2)) / (2.0 * seg.tibia * seg.femur),
        )
        .map_or(0.0, |knee| knee - FRAC_PI_2);

        let angles = [0.0, elevation + femur_offset, tibia];
        let servo = angles.map(to_servo_units);
        let left = std::array::from_fn(|i| LEFT_CENTRE[i] - servo[i]);
        let right = std::array::from_fn(|i| RIGHT_CENTRE[i] + servo[i]);

        ServoTargets {
            angles,
            servo,
            left,
            right,
        }
    }
}

/// `acos` of `ratio`, or `None` when the ratio is undefined or outside
/// `[-1, 1]`.
fn real_acos(ratio: f64) -> Option<f64> {
    let angle = ratio.acos();
    (!angle.is_nan()).then_some(angle)
}

#[allow(clippy::cast_possible_truncation)]
fn to_servo_units(angle: f64) -> i32 {
    (angle * SERVO_UNITS_PER_RAD) as i32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use legreach_core::presets;

    fn solver() -> LegKinematicsSolver {
        LegKinematicsSolver::new(presets::phantomx_mk2())
    }

    #[test]
    fn coxa_stays_centred() {
        let t = solver().servo_targets(150.0, -100.0);
        assert_relative_eq!(t.angles[0], 0.0);
        assert_eq!(t.servo[0], 0);
        assert_eq!(t.left[0], 512);
        assert_eq!(t.right[0], 512);
    }

    #[test]
    fn right_angle_knee() {
        // Femur level, tibia straight down: foot at (coxa + femur, -tibia).
        let t = solver().servo_targets(118.0, -130.0);
        // Elevation and femur offset are both the angle between the femur
        // and the coxa-to-foot line.
        let span = 66.0_f64.hypot(130.0);
        assert_relative_eq!(t.angles[1], 2.0 * (66.0 / span).acos(), epsilon = 1e-9);
        // Knee at exactly 90°: tibia command is zero.
        assert_relative_eq!(t.angles[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn servo_units_truncate_toward_zero() {
        assert_eq!(to_servo_units(1.0), 196);
        assert_eq!(to_servo_units(-1.0), -196);
        assert_eq!(to_servo_units(0.004), 0);
    }

    #[test]
    fn left_and_right_mirror_offsets() {
        let t = solver().servo_targets(180.0, -60.0);
        for i in 0..3 {
            assert_eq!(t.left[i], LEFT_CENTRE[i] - t.servo[i]);
            assert_eq!(t.right[i], RIGHT_CENTRE[i] + t.servo[i]);
        }
    }

    #[test]
    fn unreachable_target_degrades_to_zero_terms() {
        // Far beyond reach: both acos ratios leave [-1, 1].
        let t = solver().servo_targets(1000.0, 0.0);
        assert_relative_eq!(t.angles[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(t.angles[2], 0.0);
        assert_eq!(t.left, LEFT_CENTRE);
        assert_eq!(t.right, RIGHT_CENTRE);
    }

    #[test]
    fn folded_knee_maps_to_negative_quarter_turn() {
        // Fully folded at im = tibia - femur the knee ratio is exactly 1.
        let t = solver().servo_targets(52.0 + 64.0, 0.0);
        assert_relative_eq!(t.angles[2], -FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn foot_on_coxa_tip_does_not_panic() {
        let t = solver().servo_targets(52.0, 0.0);
        assert!(t.angles.iter().all(|a| a.is_finite()));
    }
}
