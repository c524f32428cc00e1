//! Shared test fixtures and utilities for legreach crates.
//!
//! Provides deterministic RNG setup and samplers for joint angles inside a
//! leg's limits.

pub mod fixtures;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{random_in_range_angles, random_point_in_box};
pub use rng::seeded_rng;
