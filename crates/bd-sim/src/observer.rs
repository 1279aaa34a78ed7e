//! Simulation observer trait for progress reporting and data collection.

use bd_agent::AgentStore;
use bd_core::Tick;
use bd_site::SiteField;
use bd_spatial::Grid;

use crate::TickSummary;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: burglary printer
///
/// ```rust,ignore
/// struct BurglaryPrinter;
///
/// impl SimObserver for BurglaryPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         println!("{}: {} burglaries", summary.tick, summary.burglaries);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the compute phase.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the commit phase, with this tick's aggregates.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`).
    ///
    /// Provides read-only access to committed site state, agent positions
    /// (through the grid) and agent liveness.
    fn on_snapshot(
        &mut self,
        _tick:   Tick,
        _sites:  &SiteField,
        _grid:   &Grid,
        _agents: &AgentStore,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
