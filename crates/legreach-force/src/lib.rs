//! Force capacity of a three-joint leg under a joint torque limit.
//!
//! For a foot target, [`LegForceCalculator`] solves the leg's inverse
//! kinematics, maps a force at the foot to joint torques through the
//! transposed Jacobian and finds the largest integer multiple of that force
//! the femur and tibia servos can hold.
//!
//! ```text
//!   (x, z) ──► IK (primary, then reverse) ──► (θ2, θ3)
//!                                                │
//!                        J(θ2, θ3) ◄─────────────┘
//!                            │
//!   τ = Jᵀ · p·F  ──► |τ| < torque_max for p = 1..=19 ──► multiplier
//! ```
//!
//! [`GridAxes`] and [`GridSweep`] evaluate the multiplier over a rectangle
//! of foot positions, in parallel with rayon or row by row, with a
//! per-row progress callback that can stop the sweep early.

pub mod calculator;
pub mod grid;
pub mod jacobian;

pub use calculator::{DEFAULT_DIRECTION, ForceSample, LegForceCalculator, MAX_MULTIPLIER};
pub use grid::{ForceGrid, GridAxes, GridSweep, RowProgress};
pub use jacobian::{joint_torques, leg_jacobian};
