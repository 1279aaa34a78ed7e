//! `bd-site`: per-site risk and attractiveness state.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`field`]   | `SiteField` (SoA, double-buffered), `StagedSite`          |
//! | [`context`] | `SiteContext<'a>`: read-only inputs to `compute_next`    |
//! | [`snapshot`]| `SiteSnapshot`: plain per-site row for reporting         |
//! | [`error`]   | `SiteError`, `SiteResult<T>`                              |
//!
//! # Update rule
//!
//! For a site with committed risk `β`, committed success probability `p_s`,
//! `n_o` offenders and `n_p` patrols on its cell, and orthogonal neighbor
//! risk sum `B_n`:
//!
//! ```text
//! β'    = (β + μ/4 · (B_n − 4β)) · (1 − ω) + θ · p_s · n_o
//! A_t'  = β' + base
//! A''   = exp(−χ · n_p)
//! p_s'  = ε · A'' / (1 + ε · A'')
//! ```
//!
//! Cells without a site contribute nothing to `B_n`; the `4β` term is kept
//! regardless, so risk leaks out across a bounded grid's edge.
//!
//! The four primed values are staged and only become visible at
//! [`SiteField::commit`].  Every site therefore reads the same snapshot of
//! its neighbors no matter the order (or thread) it is updated on.

pub mod context;
pub mod error;
pub mod field;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use context::SiteContext;
pub use error::{SiteError, SiteResult};
pub use field::{SiteField, StagedSite};
pub use snapshot::SiteSnapshot;
