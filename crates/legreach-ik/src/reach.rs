//! Height-indexed approximation of the leg's maximum horizontal reach.

use legreach_core::SegmentLengths;
use serde::{Deserialize, Serialize};

/// Safety margin subtracted from the last solvable `x` at each height (mm).
pub const REACH_MARGIN: f64 = 1.0;

/// Lower bound on the coxa-to-foot distance, keeping the law-of-cosines term
/// finite when the foot sits on the coxa tip.
const MIN_SPAN: f64 = 1e-7;

/// Maximum reachable `x` for each whole millimetre of depth below the coxa.
///
/// Entry `d` holds the largest integer `x` in `[coxa, coxa + femur + tibia)`
/// for which the femur angle is solvable at `z = d`, minus
/// [`REACH_MARGIN`]. Depths with no solvable `x` hold `0.0`.
///
/// The table is symmetric in `z`, so indexing by downward depth and by
/// height gives the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReachTable {
    max_x: Vec<f64>,
}

impl ReachTable {
    /// Scan the integer lattice once to build the table.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn build(segments: &SegmentLengths) -> Self {
        let depth_count = segments.sub_chain() as usize;
        let x_min = segments.coxa as i64;
        let x_max = segments.total() as i64;

        let max_x = (0..depth_count)
            .map(|depth| {
                let z = depth as f64;
                // Scanning downward, the first solvable x is the largest.
                (x_min..x_max)
                    .rev()
                    .map(|x| x as f64)
                    .find(|&x| is_solvable(segments, x, z))
                    .map_or(0.0, |x| x - REACH_MARGIN)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "reach table built: {} depths, x in [{x_min}, {x_max})",
            max_x.len()
        );
        Self { max_x }
    }

    /// Number of tabulated depths, one per mm.
    pub fn len(&self) -> usize {
        self.max_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max_x.is_empty()
    }

    /// Entry at integer depth `depth` (mm below the coxa).
    pub fn get(&self, depth: usize) -> Option<f64> {
        self.max_x.get(depth).copied()
    }

    /// Entry for a fractional depth, truncated toward zero.
    ///
    /// `None` for negative, NaN or out-of-table depths.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lookup(&self, depth: f64) -> Option<f64> {
        if depth.is_nan() || depth < 0.0 {
            return None;
        }
        self.get(depth.floor() as usize)
    }

    /// Entries indexed by depth.
    pub fn as_slice(&self) -> &[f64] {
        &self.max_x
    }
}

/// Whether the femur angle for a foot at `(x, z)` has a real solution.
fn is_solvable(segments: &SegmentLengths, x: f64, z: f64) -> bool {
    let dx = x.abs() - segments.coxa;
    let mut span = dx.hypot(z);
    if span == 0.0 {
        span += MIN_SPAN;
    }
    let cos_term = (segments.femur.powi(2) + span.powi(2) - segments.tibia.powi(2))
        / (2.0 * segments.femur * span);
    (-1.0..=1.0).contains(&cos_term)
}

// ---------------------------------------------------------------------------
// ReachBandSample
// ---------------------------------------------------------------------------

/// One row of the approximated reachable band: at height `z` the foot can
/// be placed anywhere in `[min_radius, max_radius]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachBandSample {
    pub z: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl ReachBandSample {
    /// Whether the band is non-empty at this height.
    pub fn is_open(&self) -> bool {
        self.max_radius >= self.min_radius
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn phantom_segments() -> SegmentLengths {
        SegmentLengths::new(52.0, 66.0, 130.0)
    }

    #[test]
    fn table_length_matches_sub_chain() {
        let table = ReachTable::build(&phantom_segments());
        assert_eq!(table.len(), 196);
        assert!(!table.is_empty());
    }

    #[test]
    fn level_reach_is_full_extension_minus_margin() {
        // At z = 0 the last solvable integer x is coxa + femur + tibia - 1
        // (full extension itself is degenerate and excluded by the scan).
        let table = ReachTable::build(&phantom_segments());
        assert_relative_eq!(table.get(0).unwrap(), 247.0 - REACH_MARGIN);
    }

    #[test]
    fn reach_shrinks_with_depth() {
        let table = ReachTable::build(&phantom_segments());
        let shallow = table.get(10).unwrap();
        let deep = table.get(150).unwrap();
        assert!(deep < shallow, "deep={deep} shallow={shallow}");
    }

    #[test]
    fn deepest_entry_is_solvable_and_inside_circle() {
        let seg = phantom_segments();
        let table = ReachTable::build(&seg);
        let depth = table.len() - 1;
        let r = table.get(depth).unwrap();
        let x = r + REACH_MARGIN;
        #[allow(clippy::cast_precision_loss)]
        let z = depth as f64;
        assert!(is_solvable(&seg, x, z));
        assert!((x - seg.coxa).hypot(z) <= seg.sub_chain());
    }

    #[test]
    fn entries_follow_circle_bound() {
        let seg = phantom_segments();
        let table = ReachTable::build(&seg);
        for (depth, &r) in table.as_slice().iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let z = depth as f64;
            let bound = seg.coxa + (seg.sub_chain().powi(2) - z * z).sqrt();
            assert!(r <= bound, "depth={depth} r={r} bound={bound}");
        }
    }

    #[test]
    fn lookup_truncates_and_bounds() {
        let table = ReachTable::build(&phantom_segments());
        assert_eq!(table.lookup(10.9), table.get(10));
        assert_eq!(table.lookup(-0.5), None);
        assert_eq!(table.lookup(f64::NAN), None);
        assert_eq!(table.lookup(196.0), None);
        assert_eq!(table.lookup(195.5), table.get(195));
    }

    #[test]
    fn solvable_handles_zero_span() {
        // Foot on the coxa tip: femur != tibia, so no solution.
        assert!(!is_solvable(&phantom_segments(), 52.0, 0.0));
        // Equal femur and tibia fold exactly onto the coxa tip.
        assert!(is_solvable(&SegmentLengths::new(10.0, 50.0, 50.0), 10.0, 0.0));
    }

    #[test]
    fn band_sample_open() {
        let s = ReachBandSample {
            z: -10.0,
            min_radius: 140.0,
            max_radius: 200.0,
        };
        assert!(s.is_open());
        let closed = ReachBandSample {
            max_radius: 100.0,
            ..s
        };
        assert!(!closed.is_open());
    }
}
