//! `bd-core`: foundational types for the burglary risk diffusion engine.
//!
//! This crate is a dependency of every other `bd-*` crate.  It has no `bd-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `SiteId`, `AgentKind`                      |
//! | [`pos`]         | `GridPos`                                             |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`params`]      | `Coefficients` (μ, ω, θ, χ, ε)                        |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global), `UnitDraw` |
//! | [`error`]       | `BdError`, `BdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and id types.     |

pub mod error;
pub mod ids;
pub mod params;
pub mod pos;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BdError, BdResult};
pub use ids::{AgentId, AgentKind, SiteId};
pub use params::Coefficients;
pub use pos::GridPos;
pub use rng::{AgentRng, FixedDraws, SimRng, UnitDraw};
pub use time::{SimConfig, Tick};
