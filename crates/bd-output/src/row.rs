//! Plain data row types written by output backends.

use bd_core::{AgentId, AgentKind, GridPos, Tick};
use bd_site::SiteSnapshot;
use bd_sim::TickSummary;

/// Aggregates of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    pub burglaries:       u64,
    pub active_offenders: u64,
    pub patrols:          u64,
    pub mean_risk:        f64,
    pub max_risk:         f64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:             s.tick.0,
            burglaries:       s.burglaries,
            active_offenders: s.active_offenders as u64,
            patrols:          s.patrols as u64,
            mean_risk:        s.mean_risk,
            max_risk:         s.max_risk,
        }
    }
}

/// Committed state of one site at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteSnapshotRow {
    pub site_id:             u32,
    pub tick:                u64,
    pub x:                   u32,
    pub y:                   u32,
    pub base_attractiveness: f64,
    pub risk:                f64,
    pub attractiveness:      f64,
    pub deterrence:          f64,
    pub success_prob:        f64,
    /// Burglaries committed at this site during the snapshot tick.
    pub burglaries:          u32,
}

impl SiteSnapshotRow {
    pub fn new(tick: Tick, s: &SiteSnapshot) -> Self {
        Self {
            site_id:             s.site.0,
            tick:                tick.0,
            x:                   s.pos.x,
            y:                   s.pos.y,
            base_attractiveness: s.base_attractiveness,
            risk:                s.risk,
            attractiveness:      s.attractiveness,
            deterrence:          s.deterrence,
            success_prob:        s.success_prob,
            burglaries:          s.burglaries,
        }
    }
}

/// Where one active agent stands at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    pub kind:     AgentKind,
    pub x:        u32,
    pub y:        u32,
}

impl AgentSnapshotRow {
    pub fn new(tick: Tick, agent: AgentId, kind: AgentKind, pos: GridPos) -> Self {
        Self { agent_id: agent.0, tick: tick.0, kind, x: pos.x, y: pos.y }
    }
}
