//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, so the compute phase produces the same
//! draws whether it runs sequentially or on rayon workers.
//!
//! # Injection
//!
//! Engine code never calls `rand` directly; it asks a [`UnitDraw`] for a
//! value in `[0, 1)`.  Tests substitute [`FixedDraws`] to force a branch.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UnitDraw ──────────────────────────────────────────────────────────────────

/// A source of uniform draws in `[0, 1)`.
pub trait UnitDraw {
    fn unit(&mut self) -> f64;
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Create one per agent at simulation init; stored in `AgentRngs` alongside
/// the other SoA arrays.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }
}

impl UnitDraw for AgentRng {
    #[inline]
    fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (initial agent placement).
///
/// Used only in single-threaded contexts.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Derive an independent stream; keeps placement draws apart from the
    /// per-agent streams seeded from the same global seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

// ── FixedDraws ────────────────────────────────────────────────────────────────

/// A scripted [`UnitDraw`] that replays `values` in order, cycling when
/// exhausted.  Values are clamped into `[0, 1)`.
#[derive(Clone, Debug)]
pub struct FixedDraws {
    values: Vec<f64>,
    next:   usize,
}

impl FixedDraws {
    /// Always return `value`.
    pub fn constant(value: f64) -> Self {
        Self::sequence(vec![value])
    }

    /// Replay `values` in order, then start again from the first.
    ///
    /// An empty sequence behaves like `constant(0.0)`.
    pub fn sequence(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self { values, next: 0 }
    }
}

impl UnitDraw for FixedDraws {
    fn unit(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next = self.next.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
