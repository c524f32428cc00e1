//! Deterministic RNG utilities for reproducible tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rng_is_deterministic() {
        use rand::Rng;
        let mut rng1 = seeded_rng(42);
        let mut rng2 = seeded_rng(42);
        let v1: f64 = rng1.r#gen();
        let v2: f64 = rng2.r#gen();
        assert!((v1 - v2).abs() < f64::EPSILON);
    }

    #[test]
    fn different_seeds_differ() {
        use rand::Rng;
        let v1: u64 = seeded_rng(1).r#gen();
        let v2: u64 = seeded_rng(2).r#gen();
        assert_ne!(v1, v2);
    }
}
