//! `bd-behavior`: what offenders and patrols decide each tick.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`intent`]   | `Intent` enum (`Burgle`, `MoveTo`, `Stay`)                    |
//! | [`context`]  | `TickContext<'a>`: read-only committed state for one tick    |
//! | [`select`]   | weighted neighbor selection shared by both agent kinds        |
//! | [`offender`] | `decide`: burgle or move                                     |
//! | [`patrol`]   | `plan_move`: always move                                     |
//!
//! # Design notes
//!
//! Every function here is pure apart from the draws it takes from the
//! caller's [`UnitDraw`][bd_core::UnitDraw].  They run during the compute
//! phase against committed state only and return an [`Intent`]; the
//! simulation applies intents during the commit phase.

pub mod context;
pub mod intent;
pub mod offender;
pub mod patrol;
pub mod select;


pub use context::TickContext;
pub use intent::Intent;
pub use select::{Candidate, orthogonal_candidates, select_weighted};
