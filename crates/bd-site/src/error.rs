use thiserror::Error;

use bd_core::{GridPos, SiteId};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("base attractiveness at {pos} must be finite and non-negative, got {value}")]
    InvalidBase { pos: GridPos, value: f64 },

    #[error("initial risk for {site} must be finite and non-negative, got {value}")]
    InvalidRisk { site: SiteId, value: f64 },

    #[error("risk at {site} must stay finite and non-negative, got {value}")]
    NonFiniteRisk { site: SiteId, value: f64 },

    #[error("{0} does not exist")]
    UnknownSite(SiteId),
}

pub type SiteResult<T> = Result<T, SiteError>;
