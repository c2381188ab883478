//! Deterministic per-segment RNG.
//!
//! # Determinism strategy
//!
//! Each segment draws from its own `SmallRng` seeded by:
//!
//!   seed = policy_seed XOR (segment_idx * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive indices uniformly across the seed space.  A
//! segment's draw therefore depends only on the policy seed and its own
//! insertion index, not on how many other segments were filled before it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::SegmentIdx;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-segment deterministic RNG.
pub struct SegmentRng(SmallRng);

impl SegmentRng {
    /// Seed deterministically from a policy seed and a segment index.
    pub fn new(seed: u64, segment: SegmentIdx) -> Self {
        let mixed = seed ^ (segment.0 as u64).wrapping_mul(MIXING_CONSTANT);
        SegmentRng(SmallRng::seed_from_u64(mixed))
    }

    /// Uniform jitter in `[-amplitude, +amplitude]`.  Zero or negative
    /// amplitude yields `0.0` without consuming randomness.
    #[inline]
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.0.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }
}
