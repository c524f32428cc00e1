//! Outline of the leg's range of motion.
//!
//! Each half of the workspace is traced by pinning one joint at a limit and
//! sweeping the other through its range, once per limit: four polylines
//! whose union bounds the region the foot can reach.

use legreach_core::sample::arange;
use legreach_core::{LegPoint, SampleError};
use serde::{Deserialize, Serialize};

use crate::reach::ReachBandSample;
use crate::solver::LegKinematicsSolver;

/// Half of the workspace, split by the sign of the knee angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionHalf {
    /// `theta3` in `[0, theta3_max]`: knee bent upward.
    Upper,
    /// `theta3` in `[theta3_min, 0]`: knee bent downward.
    Lower,
}

/// Four polylines outlining one half of the range of motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryTrace {
    pub half: MotionHalf,
    /// Femur swept with the tibia at its lower bound.
    pub femur_sweep_tibia_min: Vec<LegPoint>,
    /// Femur swept with the tibia at its upper bound.
    pub femur_sweep_tibia_max: Vec<LegPoint>,
    /// Tibia swept with the femur at its lower bound.
    pub tibia_sweep_femur_min: Vec<LegPoint>,
    /// Tibia swept with the femur at its upper bound.
    pub tibia_sweep_femur_max: Vec<LegPoint>,
}

impl BoundaryTrace {
    pub fn polylines(&self) -> [&[LegPoint]; 4] {
        [
            &self.femur_sweep_tibia_min,
            &self.femur_sweep_tibia_max,
            &self.tibia_sweep_femur_min,
            &self.tibia_sweep_femur_max,
        ]
    }

    pub fn point_count(&self) -> usize {
        self.polylines().iter().map(|line| line.len()).sum()
    }
}

impl LegKinematicsSolver {
    /// Trace the boundary of one workspace half with angular resolution
    /// `step` (rad).
    ///
    /// Sweeps run from each lower bound up to, but excluding, the upper
    /// bound. Angle pairs outside the joint ranges are skipped, so a half
    /// the tibia range does not cover yields empty polylines.
    pub fn range_of_motion(&self, half: MotionHalf, step: f64) -> Result<BoundaryTrace, SampleError> {
        let femur = self.geometry().theta2_range();
        let tibia = self.geometry().theta3_range();
        let (tibia_min, tibia_max) = match half {
            MotionHalf::Upper => (0.0, tibia.max),
            MotionHalf::Lower => (tibia.min, 0.0),
        };

        let femur_sweep = arange(femur.min, femur.max, step)?;
        let tibia_sweep = arange(tibia_min, tibia_max, step)?;

        let trace = |theta2s: &[f64], theta3s: &[f64]| -> Vec<LegPoint> {
            theta2s
                .iter()
                .flat_map(|&t2| theta3s.iter().map(move |&t3| (t2, t3)))
                .filter_map(|(t2, t3)| self.position_from_angles(t2, t3))
                .collect()
        };

        let boundary = BoundaryTrace {
            half,
            femur_sweep_tibia_min: trace(&femur_sweep, &[tibia_min]),
            femur_sweep_tibia_max: trace(&femur_sweep, &[tibia_max]),
            tibia_sweep_femur_min: trace(&[femur.min], &tibia_sweep),
            tibia_sweep_femur_max: trace(&[femur.max], &tibia_sweep),
        };
        log::debug!(
            "range of motion {half:?}: {} points at step {step}",
            boundary.point_count()
        );
        Ok(boundary)
    }

    /// Sample the approximated reachable band for `z` in `[z_min, z_max)`.
    ///
    /// The inner radius is constant; the outer radius follows the reach
    /// table and never drops below the inner one.
    pub fn approx_reach_band(
        &self,
        z_min: f64,
        z_max: f64,
        step: f64,
    ) -> Result<Vec<ReachBandSample>, SampleError> {
        if z_min > z_max {
            return Err(SampleError::InvertedBounds {
                axis: "z",
                min: z_min,
                max: z_max,
            });
        }
        let min_radius = self.approx_min_radius();
        Ok(arange(z_min, z_max, step)?
            .into_iter()
            .map(|z| ReachBandSample {
                z,
                min_radius,
                max_radius: self.approx_max_radius(z),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use legreach_core::presets;

    #[test]
    fn lower_half_has_four_populated_lines() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        let trace = solver.range_of_motion(MotionHalf::Lower, 0.01).unwrap();
        for line in trace.polylines() {
            assert!(!line.is_empty());
        }
        // Femur sweep at tibia = 0 starts fully extended at theta2_min.
        let first = trace.femur_sweep_tibia_max[0];
        let theta2_min = solver.geometry().theta2_range().min;
        assert_relative_eq!(first.x, 52.0 + 196.0 * theta2_min.cos(), epsilon = 1e-9);
        assert_relative_eq!(first.z, 196.0 * theta2_min.sin(), epsilon = 1e-9);
    }

    #[test]
    fn points_stay_inside_annulus() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        let coxa_tip = solver.coxa_tip();
        for half in [MotionHalf::Upper, MotionHalf::Lower] {
            let trace = solver.range_of_motion(half, 0.02).unwrap();
            for line in trace.polylines() {
                for p in line {
                    let d = coxa_tip.distance_to(*p);
                    assert!(d <= 196.0 + 1e-9 && d >= 64.0 - 1e-9, "d={d}");
                }
            }
        }
    }

    #[test]
    fn upper_half_empty_when_tibia_cannot_bend_up() {
        // XR-R1 tibia range tops out at 0, so the upper sweep is empty and
        // only the theta3 = 0 line survives.
        let solver = LegKinematicsSolver::new(presets::xr_r1());
        let trace = solver.range_of_motion(MotionHalf::Upper, 0.01).unwrap();
        assert!(trace.tibia_sweep_femur_min.is_empty());
        assert!(trace.tibia_sweep_femur_max.is_empty());
        assert!(!trace.femur_sweep_tibia_min.is_empty());
    }

    #[test]
    fn reach_band_follows_table() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        let band = solver.approx_reach_band(-100.0, 0.0, 1.0).unwrap();
        assert_eq!(band.len(), 100);
        assert_relative_eq!(band[0].z, -100.0);
        for s in &band {
            assert_relative_eq!(s.min_radius, 140.0);
            assert!(s.is_open());
            assert_relative_eq!(s.max_radius, solver.approx_max_radius(s.z));
        }
        // Shallower rows reach further out.
        assert!(band[99].max_radius > band[0].max_radius);
    }

    #[test]
    fn reach_band_rejects_inverted_heights() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        assert!(matches!(
            solver.approx_reach_band(10.0, -10.0, 1.0),
            Err(SampleError::InvertedBounds { axis: "z", .. })
        ));
        assert!(solver.approx_reach_band(5.0, 5.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn invalid_step_rejected() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        assert!(matches!(
            solver.range_of_motion(MotionHalf::Lower, 0.0),
            Err(SampleError::InvalidStep(_))
        ));
    }

    #[test]
    fn tiny_steps_rejected_before_sampling() {
        let solver = LegKinematicsSolver::new(presets::phantomx_mk2());
        assert!(matches!(
            solver.range_of_motion(MotionHalf::Lower, 1e-300),
            Err(SampleError::TooManySamples { .. })
        ));
        assert!(matches!(
            solver.approx_reach_band(-150.0, 50.0, 1e-300),
            Err(SampleError::TooManySamples { .. })
        ));
    }
}
