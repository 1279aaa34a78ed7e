//! `bd-sim`: tick scheduler for the burglary risk diffusion engine.
//!
//! # Two-phase tick
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Compute: census of offenders/patrols per cell;
//!               every site computes its staged next state;
//!               every offender decides Burgle or Move (and where);
//!               every patrol picks its move target.
//!               All reads see the state committed at the end of the
//!               previous tick (parallel with the `parallel` feature).
//!   ② Commit : every site adopts its staged state, tally reset;
//!               intents applied in ascending AgentId order:
//!                 Burgle(site) → register burglary, queue for removal
//!                 MoveTo(pos)  → relocate on the grid
//!                 Stay         → nothing
//!               removal queue drained; offender states reset.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on rayon's thread pool.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bd_core::{Coefficients, SimConfig};
//! use bd_sim::{NoopObserver, SimBuilder};
//! use bd_spatial::GridSpec;
//!
//! let mut sim = SimBuilder::new(config, Coefficients::default(), GridSpec::bounded(50, 50))
//!     .uniform_sites(1.0)
//!     .offenders(200)
//!     .patrols(20)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod summary;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Phase, Sim};
pub use summary::TickSummary;
