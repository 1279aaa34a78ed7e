//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use bd_agent::AgentStore;
use bd_core::Tick;
use bd_site::SiteField;
use bd_sim::{SimObserver, TickSummary};
use bd_spatial::Grid;

use crate::row::{AgentSnapshotRow, SiteSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes tick summaries and site/agent snapshots to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            log::warn!("output write failed: {e}");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, sites: &SiteField, grid: &Grid, agents: &AgentStore) {
        let site_rows: Vec<SiteSnapshotRow> = sites
            .snapshot()
            .iter()
            .map(|s| SiteSnapshotRow::new(tick, s))
            .collect();
        if !site_rows.is_empty() {
            let result = self.writer.write_site_snapshots(&site_rows);
            self.store_err(result);
        }

        // Removed offenders have no cell and are skipped.
        let agent_rows: Vec<AgentSnapshotRow> = agents
            .agent_ids()
            .filter_map(|a| {
                let pos = grid.position_of(a)?;
                Some(AgentSnapshotRow::new(tick, a, agents.kind_of(a), pos))
            })
            .collect();
        if !agent_rows.is_empty() {
            let result = self.writer.write_agent_snapshots(&agent_rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
