//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The compute phase needs `&mut AgentRngs` (exclusive access to each
//! agent's RNG) and `&AgentStore` (shared read access) at the same time.
//! Keeping RNGs in a separate struct lets the simulation borrow both:
//!
//! ```ignore
//! // bd-sim compute phase (simplified):
//! let store: &AgentStore = &sim.agents;
//! let intents = sim.rngs.inner
//!     .par_iter_mut()
//!     .enumerate()
//!     .map(|(i, rng)| plan(AgentId::from_index(i), store, rng))
//!     .collect::<Vec<_>>();
//! ```

use bd_core::{AgentId, AgentKind, AgentRng};

use crate::OffenderState;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent random sources, indexed by `AgentId`.
///
/// Generic over the draw source so tests can inject scripted draws; the
/// engine default is the seeded [`AgentRng`].
pub struct AgentRngs<D = AgentRng> {
    pub inner: Vec<D>,
}

impl AgentRngs<AgentRng> {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub fn seeded(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }
}

impl<D> AgentRngs<D> {
    /// Wrap caller-supplied sources, one per agent in id order.
    pub fn from_sources(inner: Vec<D>) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements and the `AgentId` is the
/// index into all of them.  Ids are never reused: a removed offender keeps
/// its slot with `active == false`.
pub struct AgentStore {
    /// Number of agents ever created.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Offender or patrol.  Fixed at creation.
    pub kind: Vec<AgentKind>,

    /// `false` once the agent has been removed from the simulation.
    pub active: Vec<bool>,

    /// Decision state for the current tick.
    pub state: Vec<OffenderState>,
}

impl AgentStore {
    pub(crate) fn new(offenders: usize, patrols: usize) -> Self {
        let count = offenders + patrols;
        let mut kind = vec![AgentKind::Offender; offenders];
        kind.resize(count, AgentKind::Patrol);
        Self {
            count,
            kind,
            active: vec![true; count],
            state:  vec![OffenderState::Deciding; count],
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + use<> {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn kind_of(&self, agent: AgentId) -> AgentKind {
        self.kind[agent.index()]
    }

    #[inline]
    pub fn is_active(&self, agent: AgentId) -> bool {
        self.active[agent.index()]
    }

    /// Active agents of `kind`, ascending by id.
    pub fn active_of(&self, kind: AgentKind) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids()
            .filter(move |&a| self.kind[a.index()] == kind && self.active[a.index()])
    }

    pub fn active_count(&self, kind: AgentKind) -> usize {
        self.active_of(kind).count()
    }

    /// Mark `agent` as removed.  Returns `false` if it already was.
    pub fn retire(&mut self, agent: AgentId) -> bool {
        std::mem::replace(&mut self.active[agent.index()], false)
    }

    /// Put every agent back into `Deciding` for the next tick.
    pub fn reset_states(&mut self) {
        self.state.fill(OffenderState::Deciding);
    }
}
