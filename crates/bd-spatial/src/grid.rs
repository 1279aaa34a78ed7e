//! The grid spatial index.
//!
//! # Data layout
//!
//! Cells are stored row-major: the cell at `(x, y)` lives at index
//! `y * width + x`.  Each cell keeps an ordered occupancy list of
//! [`Occupant`]s; a parallel `site_index` array gives O(1) site lookup, and
//! `placements` (indexed by `AgentId`) gives O(1) agent lookup.
//!
//! # Neighborhoods
//!
//! Neighbor cells are always produced in a fixed grid-offset order: `dx`
//! ascending, then `dy` ascending.  For the radius-1 von Neumann ring this is
//! `(-1, 0)`, `(0, -1)`, `(0, 1)`, `(1, 0)`.  Anything that breaks ties by
//! iteration order (the movement sampler does) inherits this order, which
//! keeps seeded runs reproducible.
//!
//! On a [`Topology::Bounded`] grid, offsets that leave the grid are dropped.
//! On a [`Topology::Torus`] they wrap; duplicate cells produced by wrapping on
//! very small grids are reported once, and the centre cell is never reported.

use bd_core::{AgentId, AgentKind, GridPos, SiteId};

use crate::{Census, Occupant, SpatialError, SpatialResult};

// ── GridSpec ──────────────────────────────────────────────────────────────────

/// Edge behavior of the grid.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Topology {
    /// Cells past the edge do not exist.
    #[default]
    Bounded,
    /// Both axes wrap around.
    Torus,
}

/// Grid dimensions and topology.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    pub width:  u32,
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub topology: Topology,
}

impl GridSpec {
    /// A bounded `width` x `height` grid.
    pub fn bounded(width: u32, height: u32) -> Self {
        Self { width, height, topology: Topology::Bounded }
    }
}

/// Where an agent currently stands, plus the tag it was placed with.
#[derive(Copy, Clone, Debug)]
struct Placement {
    pos:      GridPos,
    occupant: Occupant,
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Occupancy index over a 2-D grid of cells.
pub struct Grid {
    spec: GridSpec,

    /// Occupancy list per cell, row-major.
    cells: Vec<Vec<Occupant>>,

    /// Site standing in each cell, `SiteId::INVALID` if none.  Sites never
    /// move, so this is written only by `place_site`.
    site_index: Vec<SiteId>,

    /// Current placement of each agent, indexed by `AgentId`.  `None` for
    /// ids never placed or already removed.
    placements: Vec<Option<Placement>>,
}

impl Grid {
    /// Create an empty grid.  Both dimensions must be positive.
    pub fn new(spec: GridSpec) -> SpatialResult<Self> {
        if spec.width == 0 || spec.height == 0 {
            return Err(SpatialError::InvalidDimensions {
                width:  spec.width,
                height: spec.height,
            });
        }
        let cells = spec.width as usize * spec.height as usize;
        Ok(Self {
            spec,
            cells:      vec![Vec::new(); cells],
            site_index: vec![SiteId::INVALID; cells],
            placements: Vec::new(),
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.spec.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.spec.height
    }

    #[inline]
    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.spec.width && pos.y < self.spec.height
    }

    /// Every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let w = self.spec.width;
        (0..self.spec.height).flat_map(move |y| (0..w).map(move |x| GridPos::new(x, y)))
    }

    #[inline]
    fn cell_index(&self, pos: GridPos) -> usize {
        pos.y as usize * self.spec.width as usize + pos.x as usize
    }

    fn check_bounds(&self, pos: GridPos) -> SpatialResult<usize> {
        if self.contains(pos) {
            Ok(self.cell_index(pos))
        } else {
            Err(SpatialError::OutOfBounds {
                pos,
                width:  self.spec.width,
                height: self.spec.height,
            })
        }
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Put `site` in the cell at `pos`.  A cell holds at most one site.
    pub fn place_site(&mut self, site: SiteId, pos: GridPos) -> SpatialResult<()> {
        let i = self.check_bounds(pos)?;
        let existing = self.site_index[i];
        if existing != SiteId::INVALID {
            return Err(SpatialError::SiteCollision { pos, existing });
        }
        self.site_index[i] = site;
        self.cells[i].push(Occupant::Site(site));
        Ok(())
    }

    /// Put a not-yet-placed agent on the grid.
    pub fn place_agent(&mut self, agent: AgentId, kind: AgentKind, pos: GridPos) -> SpatialResult<()> {
        let i = self.check_bounds(pos)?;
        if self.position_of(agent).is_some() {
            return Err(SpatialError::AgentAlreadyPlaced(agent));
        }
        if self.placements.len() <= agent.index() {
            self.placements.resize(agent.index() + 1, None);
        }
        let occupant = Occupant::agent(kind, agent);
        self.placements[agent.index()] = Some(Placement { pos, occupant });
        self.cells[i].push(occupant);
        Ok(())
    }

    /// Relocate a placed agent to `to`.  Moving onto the current cell is a
    /// no-op.
    pub fn move_agent(&mut self, agent: AgentId, to: GridPos) -> SpatialResult<()> {
        let dest = self.check_bounds(to)?;
        let placement = self.placement(agent)?;
        if placement.pos == to {
            return Ok(());
        }
        let src = self.cell_index(placement.pos);
        detach(&mut self.cells[src], placement.occupant);
        self.cells[dest].push(placement.occupant);
        self.placements[agent.index()] = Some(Placement { pos: to, ..placement });
        Ok(())
    }

    /// Take `agent` off the grid.  Returns the cell it was standing on.
    pub fn remove_agent(&mut self, agent: AgentId) -> SpatialResult<GridPos> {
        let placement = self.placement(agent)?;
        let src = self.cell_index(placement.pos);
        detach(&mut self.cells[src], placement.occupant);
        self.placements[agent.index()] = None;
        Ok(placement.pos)
    }

    fn placement(&self, agent: AgentId) -> SpatialResult<Placement> {
        self.placements
            .get(agent.index())
            .copied()
            .flatten()
            .ok_or(SpatialError::AgentNotPlaced(agent))
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Current cell of `agent`, or `None` if it is not on the grid.
    #[inline]
    pub fn position_of(&self, agent: AgentId) -> Option<GridPos> {
        self.placements.get(agent.index()).copied().flatten().map(|p| p.pos)
    }

    /// The site standing at `pos`, if any.
    #[inline]
    pub fn site_at(&self, pos: GridPos) -> Option<SiteId> {
        if !self.contains(pos) {
            return None;
        }
        let site = self.site_index[self.cell_index(pos)];
        (site != SiteId::INVALID).then_some(site)
    }

    /// Everything standing at `pos`, in arrival order.  Empty when `pos` is
    /// outside the grid.
    #[inline]
    pub fn occupants_at(&self, pos: GridPos) -> &[Occupant] {
        if self.contains(pos) {
            &self.cells[self.cell_index(pos)]
        } else {
            &[]
        }
    }

    /// Cells within `radius` of `pos`, excluding `pos` itself.  Empty when
    /// `pos` lies outside the grid.
    ///
    /// With `include_diagonals` the neighborhood is the Moore square
    /// (Chebyshev distance); without it, the von Neumann diamond (Manhattan
    /// distance).  Order is `dx` ascending, then `dy` ascending.
    pub fn neighbor_cells(&self, pos: GridPos, radius: u32, include_diagonals: bool) -> Vec<GridPos> {
        // Offsets past the grid's extent either leave it (bounded) or revisit
        // a column or row already covered (torus), so clamp per axis.
        if !self.contains(pos) {
            return Vec::new();
        }
        let r = radius as i64;
        let rx = r.min(self.spec.width as i64 - 1);
        let ry = r.min(self.spec.height as i64 - 1);
        let wrap = self.spec.topology == Topology::Torus;

        let span = |n: i64| 2 * n as usize + 1;
        let mut out = Vec::with_capacity((span(rx) * span(ry) - 1).min(self.cell_count()));
        // Only wrapping can land on the same cell twice.
        let mut seen = if wrap { vec![false; self.cell_count()] } else { Vec::new() };
        if wrap {
            seen[self.cell_index(pos)] = true;
        }

        for dx in -rx..=rx {
            for dy in -ry..=ry {
                if (dx == 0 && dy == 0) || (!include_diagonals && dx.abs() + dy.abs() > r) {
                    continue;
                }
                let Some(cell) = self.offset(pos, dx, dy) else { continue };
                if wrap {
                    let i = self.cell_index(cell);
                    if seen[i] {
                        continue;
                    }
                    seen[i] = true;
                }
                out.push(cell);
            }
        }
        out
    }

    /// The radius-1 von Neumann ring around `pos` (up to four cells).
    #[inline]
    pub fn orthogonal_cells(&self, pos: GridPos) -> Vec<GridPos> {
        self.neighbor_cells(pos, 1, false)
    }

    /// Every occupant of every neighbor cell (see [`neighbor_cells`]).
    ///
    /// [`neighbor_cells`]: Self::neighbor_cells
    pub fn neighbors_of(
        &self,
        pos:               GridPos,
        radius:            u32,
        include_diagonals: bool,
    ) -> impl Iterator<Item = Occupant> + '_ {
        self.neighbor_cells(pos, radius, include_diagonals)
            .into_iter()
            .flat_map(move |cell| self.occupants_at(cell).iter().copied())
    }

    /// Sites in the radius-1 von Neumann ring, with their positions, in
    /// grid-offset order.  Cells without a site are skipped.
    pub fn orthogonal_sites(&self, pos: GridPos) -> impl Iterator<Item = (GridPos, SiteId)> + '_ {
        self.orthogonal_cells(pos)
            .into_iter()
            .filter_map(move |cell| self.site_at(cell).map(|site| (cell, site)))
    }

    /// Count offenders and patrols per cell.  O(agents placed).
    pub fn census(&self) -> Census {
        let mut census = Census::new(self.spec.width, self.spec.height);
        for placement in self.placements.iter().flatten() {
            match placement.occupant {
                Occupant::Offender(_) => census.add_offender(placement.pos),
                Occupant::Patrol(_)   => census.add_patrol(placement.pos),
                Occupant::Site(_)     => {}
            }
        }
        census
    }

    /// Number of agents currently on the grid.
    pub fn agents_placed(&self) -> usize {
        self.placements.iter().flatten().count()
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Apply an offset under the grid's topology.
    fn offset(&self, pos: GridPos, dx: i64, dy: i64) -> Option<GridPos> {
        let (w, h) = (self.spec.width as i64, self.spec.height as i64);
        let (x, y) = (pos.x as i64 + dx, pos.y as i64 + dy);
        match self.spec.topology {
            Topology::Bounded => {
                ((0..w).contains(&x) && (0..h).contains(&y)).then(|| GridPos::new(x as u32, y as u32))
            }
            Topology::Torus => Some(GridPos::new(x.rem_euclid(w) as u32, y.rem_euclid(h) as u32)),
        }
    }
}

/// Remove one occupant from a cell list, keeping the others in order.
fn detach(cell: &mut Vec<Occupant>, occupant: Occupant) {
    if let Some(i) = cell.iter().position(|&o| o == occupant) {
        cell.remove(i);
    }
}
