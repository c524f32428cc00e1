use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LegPoint
// ---------------------------------------------------------------------------

/// A point in the leg's sagittal plane (mm).
///
/// `x` points horizontally away from the body, `z` points up. The leg base
/// (coxa joint) sits at the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegPoint {
    pub x: f64,
    pub z: f64,
}

impl LegPoint {
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Point at `length` along bearing `angle` (rad) from `self`.
    pub fn offset_polar(self, length: f64, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            x: self.x + length * c,
            z: self.z + length * s,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

// ---------------------------------------------------------------------------
// JointAngles
// ---------------------------------------------------------------------------

/// Coxa, femur and tibia joint angles (rad).
///
/// `theta1` is always zero in the sagittal-plane formulation; it is kept so
/// callers can run [`theta1`](Self::theta1) through the same range checks as
/// the other two joints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub theta1: f64,
    pub theta2: f64,
    pub theta3: f64,
}

impl JointAngles {
    /// Planar angles with the coxa joint at zero.
    pub const fn planar(theta2: f64, theta3: f64) -> Self {
        Self {
            theta1: 0.0,
            theta2,
            theta3,
        }
    }

    pub const fn as_array(&self) -> [f64; 3] {
        [self.theta1, self.theta2, self.theta3]
    }

    pub fn to_degrees(&self) -> [f64; 3] {
        self.as_array().map(f64::to_degrees)
    }
}

// ---------------------------------------------------------------------------
// JointPositions
// ---------------------------------------------------------------------------

/// The four skeleton points of a leg: base, coxa tip, femur tip, foot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointPositions {
    points: [LegPoint; 4],
}

impl JointPositions {
    pub const fn new(base: LegPoint, coxa_tip: LegPoint, femur_tip: LegPoint, foot: LegPoint) -> Self {
        Self {
            points: [base, coxa_tip, femur_tip, foot],
        }
    }

    pub const fn base(&self) -> LegPoint {
        self.points[0]
    }

    /// Femur joint origin.
    pub const fn coxa_tip(&self) -> LegPoint {
        self.points[1]
    }

    /// Tibia joint origin.
    pub const fn femur_tip(&self) -> LegPoint {
        self.points[2]
    }

    pub const fn foot(&self) -> LegPoint {
        self.points[3]
    }

    pub fn as_slice(&self) -> &[LegPoint] {
        &self.points
    }
}

impl std::ops::Index<usize> for JointPositions {
    type Output = LegPoint;
    fn index(&self, i: usize) -> &LegPoint {
        &self.points[i]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
