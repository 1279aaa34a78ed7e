//! Offender decision: burgle the current site or move on.

use bd_core::{GridPos, UnitDraw};

use crate::select::move_intent;
use crate::{Intent, TickContext};

/// Decide an offender's action for this tick.
///
/// Draws `y` and burgles when `y` is below the committed success
/// probability of the site underfoot.  Otherwise (or when standing on a cell
/// with no site, in which case `y` is not drawn) the offender takes the move
/// branch: a weighted step toward an orthogonal neighbor site.
pub fn decide<D: UnitDraw + ?Sized>(pos: GridPos, ctx: &TickContext<'_>, rng: &mut D) -> Intent {
    if let Some(site) = ctx.grid.site_at(pos) {
        let y = rng.unit();
        if y < ctx.sites.success_prob(site) {
            return Intent::Burgle { site };
        }
    }
    move_intent(pos, ctx, rng)
}
