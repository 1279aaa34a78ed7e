//! Fluent builder for constructing a [`Sim`].

use bd_agent::{AgentRngs, AgentStoreBuilder};
use bd_core::{AgentId, AgentKind, AgentRng, Coefficients, GridPos, SimConfig, SimRng, UnitDraw};
use bd_site::SiteField;
use bd_spatial::{Grid, GridSpec};

use crate::{Sim, SimError, SimResult};

/// Stream offset for the placement RNG derived from the global seed.
const PLACEMENT_STREAM: u64 = 1;

/// Where per-agent draw sources come from.  Sources are only created here,
/// once per agent.
enum DrawSource<D> {
    /// Seeded at `build` time from the agent count and global seed.
    Seeded(fn(usize, u64) -> Vec<D>),
    /// Supplied by the caller, one per agent in id order.
    Given(Vec<D>),
}

fn seeded_agent_rngs(count: usize, seed: u64) -> Vec<AgentRng> {
    AgentRngs::seeded(count, seed).inner
}

/// Fluent builder for [`Sim<D>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, threads, output interval
/// - [`Coefficients`]: μ, ω, θ, χ, ε (validated at build)
/// - [`GridSpec`]: width, height, topology
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                                   |
/// |----------------------------|-------------------------------------------|
/// | `.site(pos, base)`         | No explicit sites                         |
/// | `.uniform_sites(base)`     | Cells without an explicit site stay empty |
/// | `.initial_risk(pos, β)`    | Every site starts at risk 0               |
/// | `.offenders(n)`            | 0 randomly placed offenders               |
/// | `.offender_at(pos)`        | No explicitly placed offenders            |
/// | `.patrols(n)`              | 0 randomly placed patrols                 |
/// | `.patrol_at(pos)`          | No explicitly placed patrols              |
/// | `.with_draws(v)`           | Seeded `AgentRng` per agent               |
///
/// Agent ids: explicitly placed offenders first, then random offenders,
/// then patrols in the same order.  Site ids: explicit sites in call order,
/// then uniform fill in row-major order.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Coefficients::default(), GridSpec::bounded(3, 3))
///     .uniform_sites(1.0)
///     .offender_at(GridPos::new(1, 1))
///     .with_draws(vec![FixedDraws::constant(0.05)])
///     .build()?;
/// ```
pub struct SimBuilder<D = AgentRng> {
    config:       SimConfig,
    coefficients: Coefficients,
    grid:         GridSpec,
    sites:        Vec<(GridPos, f64)>,
    uniform_base: Option<f64>,
    initial_risk: Vec<(GridPos, f64)>,

    random_offenders: usize,
    offenders_at:     Vec<GridPos>,
    random_patrols:   usize,
    patrols_at:       Vec<GridPos>,

    draws: DrawSource<D>,
}

impl SimBuilder<AgentRng> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, coefficients: Coefficients, grid: GridSpec) -> Self {
        Self {
            config,
            coefficients,
            grid,
            sites:            Vec::new(),
            uniform_base:     None,
            initial_risk:     Vec::new(),
            random_offenders: 0,
            offenders_at:     Vec::new(),
            random_patrols:   0,
            patrols_at:       Vec::new(),
            draws:            DrawSource::Seeded(seeded_agent_rngs),
        }
    }
}

impl<D: UnitDraw + Send> SimBuilder<D> {
    /// Add one site at `pos` with static `base` attractiveness.
    pub fn site(mut self, pos: GridPos, base: f64) -> Self {
        self.sites.push((pos, base));
        self
    }

    /// Add several sites.
    pub fn sites(mut self, sites: impl IntoIterator<Item = (GridPos, f64)>) -> Self {
        self.sites.extend(sites);
        self
    }

    /// Put a site of `base` on every cell not given one explicitly.
    pub fn uniform_sites(mut self, base: f64) -> Self {
        self.uniform_base = Some(base);
        self
    }

    /// Warm-start the risk of the site at `pos`.
    pub fn initial_risk(mut self, pos: GridPos, risk: f64) -> Self {
        self.initial_risk.push((pos, risk));
        self
    }

    /// Place `n` offenders uniformly at random (any cell, site or not).
    pub fn offenders(mut self, n: usize) -> Self {
        self.random_offenders = n;
        self
    }

    /// Place one offender at `pos`.
    pub fn offender_at(mut self, pos: GridPos) -> Self {
        self.offenders_at.push(pos);
        self
    }

    /// Place `n` patrols uniformly at random.
    pub fn patrols(mut self, n: usize) -> Self {
        self.random_patrols = n;
        self
    }

    /// Place one patrol at `pos`.
    pub fn patrol_at(mut self, pos: GridPos) -> Self {
        self.patrols_at.push(pos);
        self
    }

    /// Replace the seeded per-agent RNGs with caller-supplied draw sources,
    /// one per agent in id order.
    pub fn with_draws<E: UnitDraw + Send>(self, draws: Vec<E>) -> SimBuilder<E> {
        SimBuilder {
            config:           self.config,
            coefficients:     self.coefficients,
            grid:             self.grid,
            sites:            self.sites,
            uniform_base:     self.uniform_base,
            initial_risk:     self.initial_risk,
            random_offenders: self.random_offenders,
            offenders_at:     self.offenders_at,
            random_patrols:   self.random_patrols,
            patrols_at:       self.patrols_at,
            draws:            DrawSource::Given(draws),
        }
    }

    /// Validate inputs and assemble the [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Core`] for coefficients outside their domain.
    /// - [`SimError::Config`] for a zero thread count.
    /// - [`SimError::Spatial`] for bad grid dimensions, sites or agents
    ///   outside the grid, or two sites on one cell.
    /// - [`SimError::Site`] for negative or non-finite base attractiveness
    ///   or initial risk.
    /// - [`SimError::NoSiteAt`] for an initial risk on an empty lot.
    /// - [`SimError::AgentCountMismatch`] if injected draws don't match the
    ///   population.
    pub fn build(self) -> SimResult<Sim<D>> {
        self.coefficients.validate()?;
        if self.config.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".into()));
        }

        // ── Grid and sites ────────────────────────────────────────────────
        let mut grid = Grid::new(self.grid)?;
        let mut sites = SiteField::new();
        for &(pos, base) in &self.sites {
            let id = sites.push(pos, base, &self.coefficients)?;
            grid.place_site(id, pos)?;
        }
        if let Some(base) = self.uniform_base {
            let empty: Vec<GridPos> = grid
                .positions()
                .filter(|&pos| grid.site_at(pos).is_none())
                .collect();
            for pos in empty {
                let id = sites.push(pos, base, &self.coefficients)?;
                grid.place_site(id, pos)?;
            }
        }
        for &(pos, risk) in &self.initial_risk {
            let site = grid.site_at(pos).ok_or(SimError::NoSiteAt(pos))?;
            sites.seed_risk(site, risk)?;
        }

        // ── Agents ────────────────────────────────────────────────────────
        let n_offenders = self.offenders_at.len() + self.random_offenders;
        let n_patrols = self.patrols_at.len() + self.random_patrols;
        let agents = AgentStoreBuilder::new()
            .offenders(n_offenders)
            .patrols(n_patrols)
            .build();

        let mut placement = SimRng::new(self.config.seed).child(PLACEMENT_STREAM);
        let (width, height) = (grid.width(), grid.height());
        let mut random_pos = move || GridPos::new(placement.gen_range(0..width), placement.gen_range(0..height));

        let offender_positions = self
            .offenders_at
            .iter()
            .copied()
            .chain((0..self.random_offenders).map(|_| random_pos()))
            .collect::<Vec<_>>();
        let patrol_positions = self
            .patrols_at
            .iter()
            .copied()
            .chain((0..self.random_patrols).map(|_| random_pos()))
            .collect::<Vec<_>>();

        let kinds = std::iter::repeat(AgentKind::Offender)
            .zip(offender_positions)
            .chain(std::iter::repeat(AgentKind::Patrol).zip(patrol_positions));
        for (i, (kind, pos)) in kinds.enumerate() {
            grid.place_agent(AgentId::from_index(i), kind, pos)?;
        }

        let draws = match self.draws {
            DrawSource::Seeded(make) => make(agents.count, self.config.seed),
            DrawSource::Given(draws) => draws,
        };
        if draws.len() != agents.count {
            return Err(SimError::AgentCountMismatch {
                expected: agents.count,
                got:      draws.len(),
                what:     "draws",
            });
        }
        let rngs = AgentRngs::from_sources(draws);

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        log::info!(
            "built sim: grid={}x{} ({:?}) sites={} offenders={} patrols={} ticks={} seed={}",
            grid.width(),
            grid.height(),
            grid.spec().topology,
            sites.len(),
            n_offenders,
            n_patrols,
            self.config.total_ticks,
            self.config.seed,
        );
        log::info!(
            "coefficients: mu={} omega={} theta={} chi={} epsilon={}",
            self.coefficients.mu,
            self.coefficients.omega,
            self.coefficients.theta,
            self.coefficients.chi,
            self.coefficients.epsilon,
        );

        Ok(Sim::from_parts(
            self.config,
            self.coefficients,
            grid,
            sites,
            agents,
            rngs,
            #[cfg(feature = "parallel")]
            pool,
        ))
    }
}
