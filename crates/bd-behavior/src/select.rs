//! Probability-weighted neighbor selection.
//!
//! ```text
//! W    = Σ w_i                 (abort if no candidates or W ≤ 0)
//! p_i  = w_i / W
//! sort candidates by p_i ascending (stable: ties keep grid-offset order)
//! c_i  = Σ_{j ≤ i} p_j
//! pick the first candidate with c_i > u,  u ~ U[0, 1)
//! ```
//!
//! The sort only fixes a well-defined cumulative order; the choice
//! distribution is the same for any order.

use bd_core::{GridPos, UnitDraw};

use crate::{Intent, TickContext};

/// A neighbor cell and its (non-negative) selection weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub pos:    GridPos,
    pub weight: f64,
}

/// Sites in the von Neumann ring around `pos`, weighted by committed
/// effective attractiveness, in grid-offset order.
pub fn orthogonal_candidates(pos: GridPos, ctx: &TickContext<'_>) -> Vec<Candidate> {
    ctx.grid
        .orthogonal_sites(pos)
        .map(|(cell, site)| Candidate {
            pos:    cell,
            weight: ctx.sites.attractiveness(site),
        })
        .collect()
}

/// Pick one candidate with probability proportional to its weight.
///
/// Returns `None` without drawing when there is nothing to choose from or
/// the weights sum to zero.  Exactly one draw is taken otherwise.
pub fn select_weighted<D: UnitDraw + ?Sized>(candidates: &[Candidate], rng: &mut D) -> Option<GridPos> {
    debug_assert!(candidates.iter().all(|c| c.weight >= 0.0), "negative selection weight");

    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    if candidates.is_empty() || !total.is_finite() || total <= 0.0 {
        return None;
    }

    let mut ranked: Vec<(GridPos, f64)> = candidates
        .iter()
        .map(|c| (c.pos, c.weight / total))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let u = rng.unit();
    let mut cumulative = 0.0;
    for &(pos, p) in &ranked {
        cumulative += p;
        if cumulative > u {
            return Some(pos);
        }
    }

    // Rounding left the last bin just short of 1.
    ranked.iter().rev().find(|&&(_, p)| p > 0.0).map(|&(pos, _)| pos)
}

/// The move branch shared by offenders and patrols.
pub(crate) fn move_intent<D: UnitDraw + ?Sized>(pos: GridPos, ctx: &TickContext<'_>, rng: &mut D) -> Intent {
    let candidates = orthogonal_candidates(pos, ctx);
    match select_weighted(&candidates, rng) {
        Some(dest) => Intent::MoveTo(dest),
        None => Intent::Stay,
    }
}
