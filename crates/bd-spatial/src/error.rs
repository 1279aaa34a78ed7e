//! Spatial-subsystem error type.

use thiserror::Error;

use bd_core::{AgentId, GridPos, SiteId};

/// Errors produced by `bd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: GridPos, width: u32, height: u32 },

    #[error("cell {pos} already holds {existing}")]
    SiteCollision { pos: GridPos, existing: SiteId },

    #[error("{0} is already placed on the grid")]
    AgentAlreadyPlaced(AgentId),

    #[error("{0} is not on the grid")]
    AgentNotPlaced(AgentId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
