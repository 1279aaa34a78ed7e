use bd_core::{GridPos, SiteId};

/// Committed state of one site at a tick boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteSnapshot {
    pub site:                SiteId,
    pub pos:                 GridPos,
    pub base_attractiveness: f64,
    pub risk:                f64,
    pub attractiveness:      f64,
    pub deterrence:          f64,
    pub success_prob:        f64,
    pub burglaries:          u32,
}
