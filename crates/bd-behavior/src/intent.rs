//! Agent intents: the outcome of one agent's compute phase.

use bd_core::{GridPos, SiteId};

/// What an agent will do when the commit phase reaches it.
///
/// Exactly one intent per agent per tick, so no agent can both burgle and
/// move, or move twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Offender burgles `site` and leaves the simulation.
    Burgle { site: SiteId },

    /// Relocate to an orthogonal neighbor cell.
    MoveTo(GridPos),

    /// Took the move branch but had nowhere to go.
    Stay,
}

impl Intent {
    #[inline]
    pub fn is_burglary(&self) -> bool {
        matches!(self, Intent::Burgle { .. })
    }

    /// Destination cell, if the intent relocates the agent.
    #[inline]
    pub fn destination(&self) -> Option<GridPos> {
        match *self {
            Intent::MoveTo(pos) => Some(pos),
            _ => None,
        }
    }
}
