use bd_core::Tick;

/// Aggregate state after one tick's commit phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickSummary {
    pub tick:             Tick,
    /// Burglaries completed during this tick.
    pub burglaries:       u64,
    /// Offenders still in the simulation after this tick's removals.
    pub active_offenders: usize,
    pub patrols:          usize,
    pub mean_risk:        f64,
    pub max_risk:         f64,
}
