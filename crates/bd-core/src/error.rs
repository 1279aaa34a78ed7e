//! Engine-wide error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `SimError`, …)
//! and wrap `BdError` as one variant where configuration checks bubble up.

use thiserror::Error;

/// The top-level error type for `bd-core`.
#[derive(Debug, Error)]
pub enum BdError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("coefficient {name} = {value} is outside its domain {domain}")]
    Coefficient {
        name:   &'static str,
        value:  f64,
        domain: &'static str,
    },
}

/// Shorthand result type for `bd-core`.
pub type BdResult<T> = Result<T, BdError>;
