//! Read-only simulation state passed to every decision function.

use bd_core::Tick;
use bd_site::SiteField;
use bd_spatial::Grid;

/// A read-only snapshot of committed state for one tick's compute phase.
///
/// Built once per tick by bd-sim and shared across all agents, possibly
/// from several rayon workers.  Nothing mutates the grid or the site field
/// while a `TickContext` is alive.
#[derive(Copy, Clone)]
pub struct TickContext<'a> {
    /// Tick being computed.
    pub tick: Tick,

    /// Spatial index, positions as of the end of the previous tick.
    pub grid: &'a Grid,

    /// Committed site state (staged values are not reachable from here).
    pub sites: &'a SiteField,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(tick: Tick, grid: &'a Grid, sites: &'a SiteField) -> Self {
        Self { tick, grid, sites }
    }
}
