//! `bd-spatial`: the grid spatial index.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`grid`]       | `Grid`, `GridSpec`, `Topology`                             |
//! | [`occupant`]   | `Occupant`: tagged site / offender / patrol reference     |
//! | [`census`]     | `Census`: per-cell offender and patrol counts             |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Concurrency
//!
//! All queries take `&Grid` and the type is `Sync`, so the compute phase may
//! read it from any number of rayon workers.  Mutation (`move_agent`,
//! `remove_agent`) needs `&mut Grid`; the simulation applies it from a single
//! thread during the commit phase.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `GridSpec`/`Topology`.  |

pub mod census;
pub mod error;
pub mod grid;
pub mod occupant;


pub use census::Census;
pub use error::{SpatialError, SpatialResult};
pub use grid::{Grid, GridSpec, Topology};
pub use occupant::Occupant;
