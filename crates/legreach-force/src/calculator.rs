//! Maximum holdable force at a single foot position.

use legreach_core::{JointAngles, LegGeometry};
use legreach_ik::{LegIkResult, LegKinematicsSolver};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::jacobian::{joint_torques, leg_jacobian};

/// Largest force multiple tried by the feasibility scan.
pub const MAX_MULTIPLIER: u32 = 19;

/// Force direction used when none is given: straight up at the foot.
pub const DEFAULT_DIRECTION: (f64, f64) = (0.0, 1.0);

/// Force capacity at one foot position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSample {
    pub x: f64,
    pub z: f64,
    pub multiplier: u32,
}

// ---------------------------------------------------------------------------
// LegForceCalculator
// ---------------------------------------------------------------------------

/// Maps foot positions to the largest integer multiple of a force direction
/// whose joint torques stay strictly below the geometry's `torque_max`.
#[derive(Debug, Clone)]
pub struct LegForceCalculator {
    solver: LegKinematicsSolver,
}

impl LegForceCalculator {
    pub fn new(geometry: LegGeometry) -> Self {
        Self::from_solver(LegKinematicsSolver::new(geometry))
    }

    /// Reuse an existing solver and its reach table.
    pub const fn from_solver(solver: LegKinematicsSolver) -> Self {
        Self { solver }
    }

    pub const fn solver(&self) -> &LegKinematicsSolver {
        &self.solver
    }

    pub const fn geometry(&self) -> &LegGeometry {
        self.solver.geometry()
    }

    pub fn torque_max(&self) -> f64 {
        self.geometry().torque_max()
    }

    /// Jacobian of the foot position at the given femur and tibia angles.
    pub fn jacobian(&self, theta2: f64, theta3: f64) -> Matrix2<f64> {
        leg_jacobian(self.geometry().segments(), theta2, theta3)
    }

    /// Femur and tibia torques (N·mm) for `force` applied at the foot.
    pub fn joint_torques(&self, angles: &JointAngles, force: &Vector2<f64>) -> Vector2<f64> {
        joint_torques(&self.jacobian(angles.theta2, angles.theta3), force)
    }

    /// Pose used for force evaluation: the first IK branch that reaches
    /// `(x, z)` within the femur and tibia limits.
    pub fn feasible_pose(&self, x: f64, z: f64) -> Option<LegIkResult> {
        self.solver.solve_within_limits(x, z)
    }

    /// Largest `p` in `1..=MAX_MULTIPLIER` such that every multiple up to
    /// `p` of the force `(fx, fz)` keeps both joint torques strictly below
    /// `torque_max`.
    ///
    /// Returns `0` when the position is unreachable or outside the joint
    /// limits on both branches, or when even `p = 1` saturates a joint.
    pub fn max_force_multiplier(&self, x: f64, z: f64, fx: f64, fz: f64) -> u32 {
        let Some(pose) = self.feasible_pose(x, z) else {
            return 0;
        };
        let jacobian = self.jacobian(pose.angles.theta2, pose.angles.theta3);
        scan_multiplier(&jacobian, &Vector2::new(fx, fz), self.torque_max())
    }

    /// [`max_force_multiplier`](Self::max_force_multiplier) packaged with
    /// its position.
    pub fn sample(&self, x: f64, z: f64, fx: f64, fz: f64) -> ForceSample {
        ForceSample {
            x,
            z,
            multiplier: self.max_force_multiplier(x, z, fx, fz),
        }
    }
}

/// Scan `p = 1..=MAX_MULTIPLIER`, stopping at the first multiple whose
/// torque reaches `limit` on either joint.
fn scan_multiplier(jacobian: &Matrix2<f64>, force: &Vector2<f64>, limit: f64) -> u32 {
    (1..=MAX_MULTIPLIER)
        .take_while(|&p| {
            let tau = joint_torques(jacobian, &(force * f64::from(p)));
            tau.x.abs() < limit && tau.y.abs() < limit
        })
        .last()
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use legreach_core::presets;

    fn calculator() -> LegForceCalculator {
        LegForceCalculator::new(presets::phantomx_mk2())
    }

    #[test]
    fn unreachable_position_has_no_capacity() {
        let calc = calculator();
        assert_eq!(calc.max_force_multiplier(10_000.0, 10_000.0, 0.0, 1.0), 0);
        assert_eq!(calc.max_force_multiplier(f64::NAN, 0.0, 0.0, 1.0), 0);
    }

    #[test]
    fn level_reach_limited_by_femur() {
        // At (240, 0) the femur lever for a vertical force is dx = 188 mm:
        // 9 * 188 < 1800 <= 10 * 188.
        let calc = calculator();
        assert_eq!(calc.max_force_multiplier(240.0, 0.0, 0.0, 1.0), 9);
    }

    #[test]
    fn foot_under_coxa_tip_saturates_scan() {
        // Femur lever is zero; tibia lever is ~57 mm, so 19 * 57 < 1800.
        let calc = calculator();
        assert_eq!(calc.max_force_multiplier(52.0, -150.0, 0.0, 1.0), MAX_MULTIPLIER);
    }

    #[test]
    fn zero_force_saturates_scan() {
        let calc = calculator();
        assert_eq!(calc.max_force_multiplier(200.0, -50.0, 0.0, 0.0), MAX_MULTIPLIER);
    }

    #[test]
    fn huge_force_gives_zero() {
        let calc = calculator();
        assert_eq!(calc.max_force_multiplier(200.0, -50.0, 0.0, 1.0e6), 0);
    }

    #[test]
    fn torque_equal_to_limit_is_infeasible() {
        let j = Matrix2::identity();
        assert_eq!(scan_multiplier(&j, &Vector2::new(0.0, 100.0), 900.0), 8);
        assert_eq!(scan_multiplier(&j, &Vector2::new(-100.0, 0.0), 900.5), 9);
    }

    #[test]
    fn scan_uses_worst_joint() {
        let j = Matrix2::new(1.0, 0.0, 0.0, 3.0);
        // Tibia torque is 3p, femur torque is p.
        assert_eq!(scan_multiplier(&j, &Vector2::new(1.0, 1.0), 10.0), 3);
    }

    #[test]
    fn scan_stops_at_first_violation() {
        let j = Matrix2::identity();
        assert_eq!(scan_multiplier(&j, &Vector2::new(1000.0, 0.0), 900.0), 0);
        assert_eq!(scan_multiplier(&j, &Vector2::zeros(), 1.0), MAX_MULTIPLIER);
    }

    #[test]
    fn torques_match_jacobian_levers() {
        let calc = calculator();
        let pose = calc.feasible_pose(240.0, 0.0).unwrap();
        let foot = pose.foot();
        let femur_tip = pose.positions.femur_tip();
        let tau = calc.joint_torques(&pose.angles, &Vector2::new(0.0, 1.0));
        // Vertical force: torque equals the horizontal lever from each joint.
        assert_relative_eq!(tau.x, foot.x - 52.0, epsilon = 1e-9);
        assert_relative_eq!(tau.y, foot.x - femur_tip.x, epsilon = 1e-9);
    }

    #[test]
    fn sample_carries_position() {
        let s = calculator().sample(240.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(s.x, 240.0);
        assert_relative_eq!(s.z, 0.0);
        assert_eq!(s.multiplier, 9);
    }
}
