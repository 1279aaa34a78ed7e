//! Per-cell agent counts captured at the start of a tick.

use bd_core::GridPos;

/// Offender and patrol counts for every cell, indexed row-major.
///
/// Built by [`Grid::census`][crate::Grid::census] before any agent moves, so
/// every site's update in the same tick sees the same counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Census {
    width:     u32,
    offenders: Vec<u32>,
    patrols:   Vec<u32>,
}

impl Census {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width,
            offenders: vec![0; cells],
            patrols:   vec![0; cells],
        }
    }

    #[inline]
    fn idx(&self, pos: GridPos) -> Option<usize> {
        (pos.x < self.width).then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub(crate) fn add_offender(&mut self, pos: GridPos) {
        if let Some(n) = self.idx(pos).and_then(|i| self.offenders.get_mut(i)) {
            *n += 1;
        }
    }

    pub(crate) fn add_patrol(&mut self, pos: GridPos) {
        if let Some(n) = self.idx(pos).and_then(|i| self.patrols.get_mut(i)) {
            *n += 1;
        }
    }

    /// Offenders standing on `pos`.  Out-of-bounds positions count as 0.
    #[inline]
    pub fn offenders_at(&self, pos: GridPos) -> u32 {
        self.idx(pos).and_then(|i| self.offenders.get(i)).copied().unwrap_or(0)
    }

    /// Patrols standing on `pos`.  Out-of-bounds positions count as 0.
    #[inline]
    pub fn patrols_at(&self, pos: GridPos) -> u32 {
        self.idx(pos).and_then(|i| self.patrols.get(i)).copied().unwrap_or(0)
    }
}
