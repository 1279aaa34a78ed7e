use bd_core::{BdError, GridPos};
use bd_site::SiteError;
use bd_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] BdError),

    #[error("spatial index: {0}")]
    Spatial(#[from] SpatialError),

    #[error("site field: {0}")]
    Site(#[from] SiteError),

    #[error("initial risk given for {0}, which holds no site")]
    NoSiteAt(GridPos),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

pub type SimResult<T> = Result<T, SimError>;
