//! Planar Jacobian of the femur/tibia chain and the Jacobian-transpose
//! torque map.

use legreach_core::SegmentLengths;
use nalgebra::{Matrix2, Vector2};

/// Jacobian of the foot position `(x, z)` with respect to `(θ2, θ3)`.
///
/// Column `j` is the foot velocity produced by a unit rate on joint `j`:
///
/// ```text
/// ┌ -f·sin θ2 - t·sin(θ2+θ3)   -t·sin(θ2+θ3) ┐
/// └  f·cos θ2 + t·cos(θ2+θ3)    t·cos(θ2+θ3) ┘
/// ```
pub fn leg_jacobian(segments: &SegmentLengths, theta2: f64, theta3: f64) -> Matrix2<f64> {
    let (s2, c2) = theta2.sin_cos();
    let (s23, c23) = (theta2 + theta3).sin_cos();
    let (f, t) = (segments.femur, segments.tibia);
    Matrix2::new(
        -f * s2 - t * s23,
        -t * s23,
        f * c2 + t * c23,
        t * c23,
    )
}

/// Joint torques `τ = Jᵀ F` for a force `F` applied at the foot.
///
/// Returns `(τ_femur, τ_tibia)`.
pub fn joint_torques(jacobian: &Matrix2<f64>, force: &Vector2<f64>) -> Vector2<f64> {
    jacobian.transpose() * force
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
