//! Planar kinematics for a coxa/femur/tibia hexapod leg.
//!
//! Provides the triangle reachability test, range-gated forward kinematics,
//! closed-form two-branch inverse kinematics, joint-limit checks and the
//! height-indexed reach table used to outline the leg's usable workspace.
//!
//! # Architecture
//!
//! ```text
//! LegGeometry ──► LegKinematicsSolver ──► LegIkResult (positions, angles)
//!                   │  ├─ can_form_triangle
//!                   │  └─ ReachTable (built once)
//!                   └─► range_of_motion / approx_reach_band / servo_targets
//! ```
//!
//! The solver owns a copy of the validated geometry and its reach table and
//! never mutates either after construction, so it can be shared across
//! threads by reference.

pub mod motion;
pub mod reach;
pub mod servo;
pub mod solver;
pub mod triangle;

pub use motion::{BoundaryTrace, MotionHalf};
pub use reach::{ReachBandSample, ReachTable};
pub use servo::ServoTargets;
pub use solver::{IkBranch, Joint, JointLimitReport, LegIkResult, LegKinematicsSolver};
pub use triangle::can_form_triangle;
