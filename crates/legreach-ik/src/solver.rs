//! Closed-form planar IK/FK solver for a coxa/femur/tibia leg.
//!
//! The coxa joint is held at zero, which reduces the problem to a two-link
//! chain (femur + tibia) hanging off the coxa tip at `(coxa_length, 0)`.

use std::f64::consts::{PI, TAU};

use legreach_core::angle::wrap_angle;
use legreach_core::{ConfigError, JointAngles, JointPositions, LegGeometry, LegPoint};
use serde::{Deserialize, Serialize};

use crate::reach::ReachTable;
use crate::triangle::can_form_triangle;

// ---------------------------------------------------------------------------
// IkBranch
// ---------------------------------------------------------------------------

/// Which of the two IK solutions to produce.
///
/// `Primary` adds the law-of-cosines offset to the foot bearing, `Reverse`
/// subtracts it and flips the knee so the tibia points upward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IkBranch {
    /// Femur above the coxa-to-foot line.
    #[default]
    Primary,
    /// Femur below the coxa-to-foot line, tibia pointing upward.
    Reverse,
}

impl IkBranch {
    pub const BOTH: [Self; 2] = [Self::Primary, Self::Reverse];

    pub const fn other(self) -> Self {
        match self {
            Self::Primary => Self::Reverse,
            Self::Reverse => Self::Primary,
        }
    }

    const fn sign(self) -> f64 {
        match self {
            Self::Primary => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// LegIkResult
// ---------------------------------------------------------------------------

/// Result of an IK solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegIkResult {
    /// Whether the femur/tibia pair can reach the target exactly.
    ///
    /// When `false`, `positions` and `angles` describe the closest
    /// fully-extended or fully-folded pose instead. Joint limits are not
    /// considered here; see [`LegKinematicsSolver::joint_limit_report`].
    pub reached: bool,
    /// Branch that was requested.
    pub branch: IkBranch,
    /// Base, coxa tip, femur tip and foot.
    pub positions: JointPositions,
    /// Joint angles (rad) producing `positions`.
    pub angles: JointAngles,
}

impl LegIkResult {
    pub const fn foot(&self) -> LegPoint {
        self.positions.foot()
    }
}

// ---------------------------------------------------------------------------
// JointLimitReport
// ---------------------------------------------------------------------------

/// The three leg joints, proximal to distal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    Coxa,
    Femur,
    Tibia,
}

impl Joint {
    pub const ALL: [Self; 3] = [Self::Coxa, Self::Femur, Self::Tibia];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Coxa => "coxa",
            Self::Femur => "femur",
            Self::Tibia => "tibia",
        }
    }
}

/// Per-joint range check outcome for one set of angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointLimitReport {
    pub theta1_in_range: bool,
    pub theta2_in_range: bool,
    pub theta3_in_range: bool,
}

impl JointLimitReport {
    pub const fn all_within(&self) -> bool {
        self.theta1_in_range && self.theta2_in_range && self.theta3_in_range
    }

    /// Joints whose angle is outside its range.
    pub fn offending(&self) -> impl Iterator<Item = Joint> + '_ {
        Joint::ALL.into_iter().filter(|joint| match joint {
            Joint::Coxa => !self.theta1_in_range,
            Joint::Femur => !self.theta2_in_range,
            Joint::Tibia => !self.theta3_in_range,
        })
    }
}

// ---------------------------------------------------------------------------
// LegKinematicsSolver
// ---------------------------------------------------------------------------

/// Forward/inverse kinematics, joint-limit checks and reach approximation
/// for one leg geometry.
///
/// The reach table is built eagerly in [`new`](Self::new) and never changes.
/// The only mutable state is the minimum reach radius, which starts at the
/// geometry's `approx_min_radius`.
#[derive(Debug, Clone)]
pub struct LegKinematicsSolver {
    geometry: LegGeometry,
    reach_table: ReachTable,
    min_radius: f64,
}

impl LegKinematicsSolver {
    /// Build a solver. The geometry is already validated, so this cannot fail.
    pub fn new(geometry: LegGeometry) -> Self {
        let reach_table = ReachTable::build(geometry.segments());
        let min_radius = geometry.approx_min_radius();
        log::debug!(
            "solver for '{}': coxa={} femur={} tibia={} min_radius={min_radius}",
            geometry.name(),
            geometry.coxa_length(),
            geometry.femur_length(),
            geometry.tibia_length(),
        );
        Self {
            geometry,
            reach_table,
            min_radius,
        }
    }

    pub const fn geometry(&self) -> &LegGeometry {
        &self.geometry
    }

    pub const fn reach_table(&self) -> &ReachTable {
        &self.reach_table
    }

    /// Coxa tip (femur joint origin).
    pub const fn coxa_tip(&self) -> LegPoint {
        LegPoint::new(self.geometry.coxa_length(), 0.0)
    }

    // ---- forward kinematics ----

    /// Foot position for the given femur and tibia angles.
    ///
    /// `None` if either angle is outside its joint range.
    pub fn position_from_angles(&self, theta2: f64, theta3: f64) -> Option<LegPoint> {
        if !self.is_theta2_in_range(theta2) || !self.is_theta3_in_range(theta3) {
            return None;
        }
        Some(self.pose_from_angles(theta2, theta3).foot())
    }

    /// Skeleton for arbitrary angles, without range gating.
    pub fn pose_from_angles(&self, theta2: f64, theta3: f64) -> JointPositions {
        let coxa_tip = self.coxa_tip();
        let femur_tip = coxa_tip.offset_polar(self.geometry.femur_length(), theta2);
        let foot = femur_tip.offset_polar(self.geometry.tibia_length(), theta2 + theta3);
        JointPositions::new(LegPoint::ORIGIN, coxa_tip, femur_tip, foot)
    }

    // ---- inverse kinematics ----

    /// Solve for the joint angles placing the foot at `(x, z)`.
    ///
    /// If the femur/tibia pair cannot span the distance from the coxa tip,
    /// returns `reached = false` with the nearer of two best-effort poses:
    /// fully extended toward the target, or femur pointing away with the
    /// tibia folded back toward it. That fallback ignores `branch` and is
    /// not range-checked.
    pub fn inverse_kinematics(&self, x: f64, z: f64, branch: IkBranch) -> LegIkResult {
        let femur = self.geometry.femur_length();
        let tibia = self.geometry.tibia_length();
        let coxa_tip = self.coxa_tip();

        let dx = x - coxa_tip.x;
        let coxa_to_foot = dx.hypot(z);
        let bearing = z.atan2(dx);

        if !can_form_triangle(tibia, femur, coxa_to_foot) {
            return self.closest_pose(LegPoint::new(x, z), bearing, branch);
        }

        let cos_offset = (femur.powi(2) + coxa_to_foot.powi(2) - tibia.powi(2))
            / (2.0 * femur * coxa_to_foot);
        // A strict triangle keeps this inside (-1, 1) up to rounding.
        let offset = cos_offset.clamp(-1.0, 1.0).acos();
        let theta2 = wrap_angle(bearing + branch.sign() * offset);

        let femur_tip = coxa_tip.offset_polar(femur, theta2);
        let theta3 = wrap_angle((z - femur_tip.z).atan2(x - femur_tip.x) - theta2);

        LegIkResult {
            reached: true,
            branch,
            positions: JointPositions::new(
                LegPoint::ORIGIN,
                coxa_tip,
                femur_tip,
                LegPoint::new(x, z),
            ),
            angles: JointAngles::planar(theta2, theta3),
        }
    }

    fn closest_pose(&self, target: LegPoint, bearing: f64, branch: IkBranch) -> LegIkResult {
        let femur = self.geometry.femur_length();
        let tibia = self.geometry.tibia_length();
        let coxa_tip = self.coxa_tip();

        let mut phase = bearing + PI;
        if phase > TAU {
            phase -= TAU;
        }

        let extended = coxa_tip.offset_polar(femur + tibia, bearing);
        let folded = coxa_tip
            .offset_polar(femur, phase)
            .offset_polar(tibia, bearing);

        let (theta2, theta3) = if target.distance_to(extended) > target.distance_to(folded) {
            (phase, -PI)
        } else {
            (bearing, 0.0)
        };

        LegIkResult {
            reached: false,
            branch,
            positions: self.pose_from_angles(theta2, theta3),
            angles: JointAngles::planar(theta2, theta3),
        }
    }

    /// First branch (primary, then reverse) that reaches `(x, z)` with the
    /// femur and tibia angles inside their ranges.
    pub fn solve_within_limits(&self, x: f64, z: f64) -> Option<LegIkResult> {
        IkBranch::BOTH
            .into_iter()
            .map(|branch| self.inverse_kinematics(x, z, branch))
            .find(|result| {
                result.reached
                    && self.is_theta2_in_range(result.angles.theta2)
                    && self.is_theta3_in_range(result.angles.theta3)
            })
    }

    // ---- joint limits ----

    /// `true` if `theta1` (rad) lies within the coxa limits, bounds included.
    pub fn is_theta1_in_range(&self, theta1: f64) -> bool {
        self.geometry.theta1_range().contains(theta1)
    }

    /// `true` if `theta2` (rad) lies within the femur limits, bounds included.
    pub fn is_theta2_in_range(&self, theta2: f64) -> bool {
        self.geometry.theta2_range().contains(theta2)
    }

    /// `true` if `theta3` (rad) lies within the tibia limits, bounds included.
    pub fn is_theta3_in_range(&self, theta3: f64) -> bool {
        self.geometry.theta3_range().contains(theta3)
    }

    pub fn joint_limit_report(&self, angles: &JointAngles) -> JointLimitReport {
        JointLimitReport {
            theta1_in_range: self.is_theta1_in_range(angles.theta1),
            theta2_in_range: self.is_theta2_in_range(angles.theta2),
            theta3_in_range: self.is_theta3_in_range(angles.theta3),
        }
    }

    // ---- reach approximation ----

    /// Approximate maximum horizontal reach at height `z` (mm).
    ///
    /// Never below [`approx_min_radius`](Self::approx_min_radius): heights
    /// above the coxa, below the table, or with a smaller table entry all
    /// yield the minimum radius.
    pub fn approx_max_radius(&self, z: f64) -> f64 {
        self.reach_table
            .lookup(-z)
            .map_or(self.min_radius, |r| r.max(self.min_radius))
    }

    pub const fn approx_min_radius(&self) -> f64 {
        self.min_radius
    }

    /// Override the minimum reach radius.
    pub fn set_approx_min_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        if !radius.is_finite() {
            return Err(ConfigError::NonFinite("approx_min_radius"));
        }
        if radius < 0.0 {
            return Err(ConfigError::NegativeMinRadius(radius));
        }
        self.min_radius = radius;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
