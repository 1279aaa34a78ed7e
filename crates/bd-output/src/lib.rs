//! `bd-output`: simulation output writers.
//!
//! | Feature   | Backend | Files created                                                   |
//! |-----------|---------|-----------------------------------------------------------------|
//! | *(none)*  | CSV     | `tick_summaries.csv`, `site_snapshots.csv`, `agent_snapshots.csv` |
//! | `sqlite`  | SQLite  | `output.db` (one table per CSV file)                            |
//! | `parquet` | Parquet | `tick_summaries.parquet`, `site_snapshots.parquet`, `agent_snapshots.parquet` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `bd_sim::SimObserver`.
//!
//! `site_snapshots.csv` is the per-site crime history: risk, effective
//! attractiveness, success probability and burglary tally of every site at
//! every snapshot tick.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bd_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, SiteSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
