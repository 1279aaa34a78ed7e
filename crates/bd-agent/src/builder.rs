//! Fluent builder for constructing an `AgentStore`.
//!
//! Draw sources are built separately (see [`AgentRngs::seeded`]) so callers
//! that inject their own never pay for seeding.
//!
//! # Usage
//!
//! ```rust
//! use bd_agent::{AgentRngs, AgentStoreBuilder};
//! use bd_core::AgentKind;
//!
//! let store = AgentStoreBuilder::new()
//!     .offenders(30)
//!     .patrols(5)
//!     .build();
//! let rngs = AgentRngs::seeded(store.count, /*seed=*/ 42);
//!
//! assert_eq!(store.count, 35);
//! assert_eq!(rngs.len(),  35);
//! assert_eq!(store.kind_of(bd_core::AgentId(0)), AgentKind::Offender);
//! ```
//!
//! [`AgentRngs::seeded`]: crate::AgentRngs::seeded

use crate::AgentStore;

/// Fluent builder for [`AgentStore`].
///
/// Offenders take the low ids (`0..offenders`), patrols the ids after them.
#[derive(Debug, Default)]
pub struct AgentStoreBuilder {
    offenders: usize,
    patrols:   usize,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of offenders.
    pub fn offenders(mut self, n: usize) -> Self {
        self.offenders = n;
        self
    }

    /// Number of patrol units.
    pub fn patrols(mut self, n: usize) -> Self {
        self.patrols = n;
        self
    }

    pub fn build(self) -> AgentStore {
        AgentStore::new(self.offenders, self.patrols)
    }
}
