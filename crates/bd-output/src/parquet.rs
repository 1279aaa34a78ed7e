//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `tick_summaries.parquet`
//! - `site_snapshots.parquet`
//! - `agent_snapshots.parquet`
//!
//! Tick summaries are buffered and written as one row group at `finish`;
//! snapshots go out as one batch per snapshot tick.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, SiteSnapshotRow, TickSummaryRow};

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick",             DataType::UInt64,  false),
        Field::new("burglaries",       DataType::UInt64,  false),
        Field::new("active_offenders", DataType::UInt64,  false),
        Field::new("patrols",          DataType::UInt64,  false),
        Field::new("mean_risk",        DataType::Float64, false),
        Field::new("max_risk",         DataType::Float64, false),
    ]))
}

fn site_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("site_id",             DataType::UInt32,  false),
        Field::new("tick",                DataType::UInt64,  false),
        Field::new("x",                   DataType::UInt32,  false),
        Field::new("y",                   DataType::UInt32,  false),
        Field::new("base_attractiveness", DataType::Float64, false),
        Field::new("risk",                DataType::Float64, false),
        Field::new("attractiveness",      DataType::Float64, false),
        Field::new("deterrence",          DataType::Float64, false),
        Field::new("success_prob",        DataType::Float64, false),
        Field::new("burglaries",          DataType::UInt32,  false),
    ]))
}

fn agent_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("agent_id", DataType::UInt32, false),
        Field::new("tick",     DataType::UInt64, false),
        Field::new("kind",     DataType::Utf8,   false),
        Field::new("x",        DataType::UInt32, false),
        Field::new("y",        DataType::UInt32, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    summaries: Option<ArrowWriter<File>>,
    sites:     Option<ArrowWriter<File>>,
    agents:    Option<ArrowWriter<File>>,

    summary_schema: Arc<Schema>,
    site_schema:    Arc<Schema>,
    agent_schema:   Arc<Schema>,

    pending_summaries: Vec<TickSummaryRow>,
}

impl ParquetWriter {
    /// Create the three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let summary_schema = summary_schema();
        let site_schema = site_schema();
        let agent_schema = agent_schema();

        Ok(Self {
            summaries: Some(open(dir, "tick_summaries.parquet", &summary_schema)?),
            sites:     Some(open(dir, "site_snapshots.parquet", &site_schema)?),
            agents:    Some(open(dir, "agent_snapshots.parquet", &agent_schema)?),
            summary_schema,
            site_schema,
            agent_schema,
            pending_summaries: Vec::new(),
        })
    }

    fn flush_summaries(&mut self) -> OutputResult<()> {
        if self.pending_summaries.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let mut ticks      = UInt64Builder::new();
        let mut burglaries = UInt64Builder::new();
        let mut offenders  = UInt64Builder::new();
        let mut patrols    = UInt64Builder::new();
        let mut mean_risk  = Float64Builder::new();
        let mut max_risk   = Float64Builder::new();

        for row in self.pending_summaries.drain(..) {
            ticks.append_value(row.tick);
            burglaries.append_value(row.burglaries);
            offenders.append_value(row.active_offenders);
            patrols.append_value(row.patrols);
            mean_risk.append_value(row.mean_risk);
            max_risk.append_value(row.max_risk);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summary_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(burglaries.finish()),
                Arc::new(offenders.finish()),
                Arc::new(patrols.finish()),
                Arc::new(mean_risk.finish()),
                Arc::new(max_risk.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }
}

impl OutputWriter for ParquetWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.pending_summaries.push(*row);
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.sites.as_mut() else {
            return Ok(());
        };

        let mut site_ids       = UInt32Builder::new();
        let mut ticks          = UInt64Builder::new();
        let mut xs             = UInt32Builder::new();
        let mut ys             = UInt32Builder::new();
        let mut bases          = Float64Builder::new();
        let mut risks          = Float64Builder::new();
        let mut attractiveness = Float64Builder::new();
        let mut deterrence     = Float64Builder::new();
        let mut success_prob   = Float64Builder::new();
        let mut burglaries     = UInt32Builder::new();

        for row in rows {
            site_ids.append_value(row.site_id);
            ticks.append_value(row.tick);
            xs.append_value(row.x);
            ys.append_value(row.y);
            bases.append_value(row.base_attractiveness);
            risks.append_value(row.risk);
            attractiveness.append_value(row.attractiveness);
            deterrence.append_value(row.deterrence);
            success_prob.append_value(row.success_prob);
            burglaries.append_value(row.burglaries);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.site_schema),
            vec![
                Arc::new(site_ids.finish()),
                Arc::new(ticks.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
                Arc::new(bases.finish()),
                Arc::new(risks.finish()),
                Arc::new(attractiveness.finish()),
                Arc::new(deterrence.finish()),
                Arc::new(success_prob.finish()),
                Arc::new(burglaries.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_agent_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.agents.as_mut() else {
            return Ok(());
        };

        let mut agent_ids = UInt32Builder::new();
        let mut ticks     = UInt64Builder::new();
        let mut kinds     = StringBuilder::new();
        let mut xs        = UInt32Builder::new();
        let mut ys        = UInt32Builder::new();

        for row in rows {
            agent_ids.append_value(row.agent_id);
            ticks.append_value(row.tick);
            kinds.append_value(row.kind.as_str());
            xs.append_value(row.x);
            ys.append_value(row.y);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.agent_schema),
            vec![
                Arc::new(agent_ids.finish()),
                Arc::new(ticks.finish()),
                Arc::new(kinds.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.flush_summaries()?;
        for slot in [&mut self.summaries, &mut self.sites, &mut self.agents] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
