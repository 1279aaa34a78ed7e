//! `bd-agent`: Structure-of-Arrays agent storage.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs<D>` (per-agent RNG) |
//! | [`state`]       | `OffenderState`: per-tick decision state                 |
//! | [`builder`]     | `AgentStoreBuilder` (fluent construction)                 |
//!
//! Agent positions are not stored here: the spatial index in `bd-spatial`
//! is the single authority on where an agent stands.

pub mod builder;
pub mod state;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use state::OffenderState;
pub use store::{AgentRngs, AgentStore};
