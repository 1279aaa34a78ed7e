//! Tagged references to whatever stands in a grid cell.

use bd_core::{AgentId, AgentKind, SiteId};

/// One entry in a cell's occupancy list.
///
/// Scans over a neighborhood match on the tag instead of inspecting types at
/// run time.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Occupant {
    Site(SiteId),
    Offender(AgentId),
    Patrol(AgentId),
}

impl Occupant {
    /// Build the occupant entry for an agent of `kind`.
    #[inline]
    pub fn agent(kind: AgentKind, id: AgentId) -> Self {
        match kind {
            AgentKind::Offender => Occupant::Offender(id),
            AgentKind::Patrol   => Occupant::Patrol(id),
        }
    }
}
