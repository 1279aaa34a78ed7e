//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `tick_summaries.csv`
//! - `site_snapshots.csv`
//! - `agent_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, SiteSnapshotRow, TickSummaryRow};

pub const TICK_SUMMARY_HEADER: [&str; 6] =
    ["tick", "burglaries", "active_offenders", "patrols", "mean_risk", "max_risk"];

pub const SITE_SNAPSHOT_HEADER: [&str; 10] = [
    "site_id",
    "tick",
    "x",
    "y",
    "base_attractiveness",
    "risk",
    "attractiveness",
    "deterrence",
    "success_prob",
    "burglaries",
];

pub const AGENT_SNAPSHOT_HEADER: [&str; 5] = ["agent_id", "tick", "kind", "x", "y"];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    sites:     Writer<File>,
    agents:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files and write headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TICK_SUMMARY_HEADER)?;

        let mut sites = Writer::from_path(dir.join("site_snapshots.csv"))?;
        sites.write_record(SITE_SNAPSHOT_HEADER)?;

        let mut agents = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        agents.write_record(AGENT_SNAPSHOT_HEADER)?;

        log::debug!("csv output opened in {}", dir.display());
        Ok(Self { summaries, sites, agents, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.burglaries.to_string(),
            row.active_offenders.to_string(),
            row.patrols.to_string(),
            row.mean_risk.to_string(),
            row.max_risk.to_string(),
        ])?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.sites.write_record(&[
                row.site_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.base_attractiveness.to_string(),
                row.risk.to_string(),
                row.attractiveness.to_string(),
                row.deterrence.to_string(),
                row.success_prob.to_string(),
                row.burglaries.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.kind.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.sites.flush()?;
        self.agents.flush()?;
        Ok(())
    }
}
