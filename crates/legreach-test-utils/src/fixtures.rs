//! Random samplers constrained by a leg's geometry.

use legreach_core::{JointAngles, JointRange, LegGeometry, LegPoint};
use rand::Rng;

/// Sample joint angles uniformly inside the geometry's femur and tibia
/// ranges, with the coxa at rest.
///
/// The knee is kept at least `knee_margin` (rad) away from straight, where
/// the two IK branches coincide and round trips lose precision.
///
/// # Panics
///
/// If the tibia range leaves no room outside the margin.
pub fn random_in_range_angles(
    rng: &mut impl Rng,
    geometry: &LegGeometry,
    knee_margin: f64,
) -> JointAngles {
    let theta2 = sample(rng, geometry.theta2_range());
    let tibia = geometry.theta3_range();
    assert!(
        tibia.min < -knee_margin || tibia.max > knee_margin,
        "tibia range leaves no room outside the knee margin"
    );
    let theta3 = loop {
        let t = sample(rng, tibia);
        if t.abs() >= knee_margin {
            break t;
        }
    };
    JointAngles::planar(theta2, theta3)
}

/// Sample a point uniformly in the box `[x_lo, x_hi) x [z_lo, z_hi)`.
pub fn random_point_in_box(rng: &mut impl Rng, x: (f64, f64), z: (f64, f64)) -> LegPoint {
    LegPoint::new(rng.gen_range(x.0..x.1), rng.gen_range(z.0..z.1))
}

fn sample(rng: &mut impl Rng, range: JointRange) -> f64 {
    if range.span() <= 0.0 {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use legreach_core::presets;

    #[test]
    fn angles_respect_limits_and_margin() {
        let geometry = presets::phantomx_mk2();
        let mut rng = seeded_rng(3);
        for _ in 0..200 {
            let a = random_in_range_angles(&mut rng, &geometry, 0.1);
            assert!(geometry.theta2_range().contains(a.theta2));
            assert!(geometry.theta3_range().contains(a.theta3));
            assert!(a.theta3.abs() >= 0.1);
            assert!(a.theta1.abs() < f64::EPSILON);
        }
    }

    #[test]
    fn point_in_box() {
        let mut rng = seeded_rng(5);
        for _ in 0..100 {
            let p = random_point_in_box(&mut rng, (0.0, 10.0), (-5.0, 5.0));
            assert!((0.0..10.0).contains(&p.x));
            assert!((-5.0..5.0).contains(&p.z));
        }
    }
}
