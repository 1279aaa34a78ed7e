//! Per-tick offender decision state.

/// `Deciding → {Burgling, Moving}` within a tick; every offender is reset
/// to `Deciding` once the commit phase finishes.  Patrols stay `Deciding`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum OffenderState {
    #[default]
    Deciding,
    Burgling,
    Moving,
}
