//! Read-only inputs shared by every site update in a tick.

use bd_core::Coefficients;
use bd_spatial::{Census, Grid};

/// Everything `compute_next` needs besides the field itself.
///
/// Built once per tick by the simulation, after the census and before any
/// agent moves.
#[derive(Copy, Clone)]
pub struct SiteContext<'a> {
    pub grid:         &'a Grid,
    pub census:       &'a Census,
    pub coefficients: &'a Coefficients,
}

impl<'a> SiteContext<'a> {
    #[inline]
    pub fn new(grid: &'a Grid, census: &'a Census, coefficients: &'a Coefficients) -> Self {
        Self { grid, census, coefficients }
    }
}
