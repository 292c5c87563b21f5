//! Deterministic per-agent randomness.
//!
//! Not cryptographic. Streams are derived from `(global seed, agent, stream)` so two
//! agents never share a sequence and replays with the same seed are identical.

use core::f32::consts::TAU;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }

    /// Uniform value in `[0, 1)` with 24 bits of precision.
    pub fn next_unit(&mut self) -> f32 {
        let bits = (self.next_u64() >> 40) as u32;
        bits as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn next_range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_unit()
    }

    /// Heading in radians, `[0, 2π)`.
    pub fn next_heading(&mut self) -> f32 {
        self.next_unit() * TAU
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub fn derive_seed(global_seed: u64, agent: u64, stream: u64) -> u64 {
    mix64(global_seed ^ mix64(agent.wrapping_add(GOLDEN_GAMMA)) ^ mix64(stream))
}
