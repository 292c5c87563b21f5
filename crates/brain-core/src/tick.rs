use crate::{rng, AgentId, SplitMix64};

/// One fixed-rate simulation step.
///
/// Everything time-bounded in the planner is driven by accumulated `dt_seconds`,
/// never by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self {
            tick,
            dt_seconds,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Context for the following step, same `dt` and seed.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick.wrapping_add(1),
            ..self
        }
    }

    /// Simulated time at the start of this tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 * f64::from(self.dt_seconds)
    }

    /// Per-agent RNG; `stream` separates independent consumers within one agent.
    pub fn rng_for(&self, agent: AgentId, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, agent.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
