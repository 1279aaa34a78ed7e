//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `tick_summaries`, `site_snapshots` and `agent_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, SiteSnapshotRow, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick             INTEGER PRIMARY KEY,
                 burglaries       INTEGER NOT NULL,
                 active_offenders INTEGER NOT NULL,
                 patrols          INTEGER NOT NULL,
                 mean_risk        REAL    NOT NULL,
                 max_risk         REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS site_snapshots (
                 site_id             INTEGER NOT NULL,
                 tick                INTEGER NOT NULL,
                 x                   INTEGER NOT NULL,
                 y                   INTEGER NOT NULL,
                 base_attractiveness REAL    NOT NULL,
                 risk                REAL    NOT NULL,
                 attractiveness      REAL    NOT NULL,
                 deterrence          REAL    NOT NULL,
                 success_prob        REAL    NOT NULL,
                 burglaries          INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id INTEGER NOT NULL,
                 tick     INTEGER NOT NULL,
                 kind     TEXT    NOT NULL,
                 x        INTEGER NOT NULL,
                 y        INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, burglaries, active_offenders, patrols, mean_risk, max_risk) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.tick,
                row.burglaries,
                row.active_offenders,
                row.patrols,
                row.mean_risk,
                row.max_risk,
            ],
        )?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO site_snapshots \
                 (site_id, tick, x, y, base_attractiveness, risk, attractiveness, \
                  deterrence, success_prob, burglaries) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.site_id,
                    row.tick,
                    row.x,
                    row.y,
                    row.base_attractiveness,
                    row.risk,
                    row.attractiveness,
                    row.deterrence,
                    row.success_prob,
                    row.burglaries,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots (agent_id, tick, kind, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick,
                    row.kind.as_str(),
                    row.x,
                    row.y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
