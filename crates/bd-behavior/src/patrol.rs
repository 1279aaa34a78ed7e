//! Patrol movement.

use bd_core::{GridPos, UnitDraw};

use crate::select::move_intent;
use crate::{Intent, TickContext};

/// A patrol always moves, weighted toward attractive neighbor sites.
#[inline]
pub fn plan_move<D: UnitDraw + ?Sized>(pos: GridPos, ctx: &TickContext<'_>, rng: &mut D) -> Intent {
    move_intent(pos, ctx, rng)
}
