//! The `Sim` struct and its tick loop.

use bd_agent::{AgentRngs, AgentStore, OffenderState};
use bd_behavior::{Intent, TickContext, offender, patrol};
use bd_core::{AgentId, AgentKind, AgentRng, Coefficients, GridPos, SimConfig, Tick, UnitDraw};
use bd_site::{SiteContext, SiteField, StagedSite};
use bd_spatial::{Census, Grid};

use crate::{SimObserver, SimResult, TickSummary};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Where the engine is within a tick.
///
/// `Idle → Compute → Commit → Idle`.  Outside [`Sim::tick`] the engine is
/// always `Idle`; the other two are visible only to debug assertions.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Compute,
    Commit,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<D>` holds all simulation state and drives the two-phase tick:
///
/// 1. **Compute** (optionally parallel with the `parallel` feature):
///    - take a census of offenders and patrols per cell;
///    - stage every site's next risk, deterrence and success probability;
///    - every active agent turns its committed surroundings into an
///      [`Intent`] using its own draw source.
/// 2. **Commit** (sequential, ascending `AgentId` for determinism):
///    - every site adopts its staged values, burglary tallies reset;
///    - `Burgle{site}` → tally the burglary, queue the offender for removal;
///    - `MoveTo(pos)`  → relocate on the grid;
///    - the removal queue is drained, offender states reset.
///
/// `D` is the per-agent draw source: seeded [`AgentRng`] in production,
/// scripted draws in tests.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: UnitDraw + Send = AgentRng> {
    /// Global configuration (total ticks, seed, threads, output interval).
    pub config: SimConfig,

    /// Model coefficients, validated at build time and fixed for the run.
    coefficients: Coefficients,

    /// Next tick to be processed.
    tick: Tick,

    phase: Phase,

    /// Spatial index; the single authority on agent positions.
    grid: Grid,

    sites: SiteField,

    agents: AgentStore,

    /// Per-agent draw sources, separated for the split-borrow pattern.
    rngs: AgentRngs<D>,

    /// Offenders that burgled this tick, removed once every intent applied.
    removal_queue: Vec<AgentId>,

    /// Aggregates of the most recently completed tick.
    last_summary: TickSummary,

    /// Burglaries across the whole run.
    total_burglaries: u64,

    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<D: UnitDraw + Send> Sim<D> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        config:       SimConfig,
        coefficients: Coefficients,
        grid:         Grid,
        sites:        SiteField,
        agents:       AgentStore,
        rngs:         AgentRngs<D>,
        #[cfg(feature = "parallel")] pool: Option<rayon::ThreadPool>,
    ) -> Self {
        let last_summary = TickSummary {
            tick:             Tick::ZERO,
            burglaries:       0,
            active_offenders: agents.active_count(AgentKind::Offender),
            patrols:          agents.active_count(AgentKind::Patrol),
            mean_risk:        sites.mean_risk(),
            max_risk:         sites.max_risk(),
        };
        Self {
            config,
            coefficients,
            tick: Tick::ZERO,
            phase: Phase::Idle,
            grid,
            sites,
            agents,
            rngs,
            removal_queue: Vec::new(),
            last_summary,
            total_burglaries: 0,
            #[cfg(feature = "parallel")]
            pool,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.tick < self.config.end_tick() {
            self.observed_tick(observer)?;
        }
        observer.on_sim_end(self.tick);
        log::info!(
            "run finished: tick={} burglaries={} offenders_left={} mean_risk={:.4}",
            self.tick.0,
            self.total_burglaries,
            self.last_summary.active_offenders,
            self.last_summary.mean_risk,
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.observed_tick(observer)?;
        }
        Ok(())
    }

    /// Advance exactly one tick without an observer.
    ///
    /// Fails with [`SiteError::NonFiniteRisk`][bd_site::SiteError] when a
    /// risk level overflows; the tick is then not counted and nothing from
    /// it is committed.
    pub fn tick(&mut self) -> SimResult<TickSummary> {
        let now = self.tick;
        let summary = self.process_tick(now)?;
        self.tick = now.next();
        Ok(summary)
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// The next tick to be processed (equals the number of ticks run).
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn sites(&self) -> &SiteField {
        &self.sites
    }

    #[inline]
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    /// Where `agent` stands, or `None` once it has been removed.
    #[inline]
    pub fn position_of(&self, agent: AgentId) -> Option<GridPos> {
        self.grid.position_of(agent)
    }

    /// Burglaries completed during the last tick.
    #[inline]
    pub fn burglaries_this_tick(&self) -> u64 {
        self.last_summary.burglaries
    }

    #[inline]
    pub fn total_burglaries(&self) -> u64 {
        self.total_burglaries
    }

    /// Aggregates of the last completed tick (tick 0 state before any ran).
    #[inline]
    pub fn last_summary(&self) -> &TickSummary {
        &self.last_summary
    }

    /// Committed risk per cell, row-major.  Cells without a site read `0.0`.
    pub fn risk_field(&self) -> Vec<f64> {
        let mut field = vec![0.0; self.grid.cell_count()];
        let width = self.grid.width() as usize;
        for site in self.sites.ids() {
            let pos = self.sites.pos(site);
            field[pos.y as usize * width + pos.x as usize] = self.sites.risk(site);
        }
        field
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn observed_tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now)?;
        observer.on_tick_end(&summary);
        if self.config.snapshot_due(now) {
            observer.on_snapshot(now, &self.sites, &self.grid, &self.agents);
        }
        self.tick = now.next();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<TickSummary> {
        debug_assert_eq!(self.phase, Phase::Idle);

        // ── Phase 1: compute ──────────────────────────────────────────────
        //
        // Everything below reads only state committed at the end of the
        // previous tick.  Site results go into the back buffer; agent
        // results come back as intents.
        self.phase = Phase::Compute;
        let census = self.grid.census();
        let staged = self.compute_sites(&census);
        let intents = self.compute_intents(now);
        self.sites.stage_all(staged);
        for &(agent, intent) in &intents {
            if self.agents.kind_of(agent) == AgentKind::Offender {
                self.agents.state[agent.index()] = match intent {
                    Intent::Burgle { .. } => OffenderState::Burgling,
                    _ => OffenderState::Moving,
                };
            }
        }

        // ── Phase 2: commit ───────────────────────────────────────────────
        //
        // Site commit first: it clears the burglary tallies so the ones
        // registered below count this tick only.  An overflowed risk level
        // aborts the tick with nothing committed.
        self.phase = Phase::Commit;
        if let Err(e) = self.sites.commit_all() {
            self.phase = Phase::Idle;
            log::error!("tick={} aborted: {e}", now.0);
            return Err(e.into());
        }
        for (agent, intent) in intents {
            self.apply_intent(agent, intent, now)?;
        }
        self.drain_removals(now)?;
        self.agents.reset_states();
        self.phase = Phase::Idle;

        let summary = TickSummary {
            tick:             now,
            burglaries:       self.sites.total_burglaries(),
            active_offenders: self.agents.active_count(AgentKind::Offender),
            patrols:          self.agents.active_count(AgentKind::Patrol),
            mean_risk:        self.sites.mean_risk(),
            max_risk:         self.sites.max_risk(),
        };
        self.total_burglaries += summary.burglaries;
        self.last_summary = summary;

        log::debug!(
            "tick={} burglaries={} offenders={} mean_risk={:.4} max_risk={:.4}",
            now.0,
            summary.burglaries,
            summary.active_offenders,
            summary.mean_risk,
            summary.max_risk,
        );
        Ok(summary)
    }

    /// Next-tick values for every site, in `SiteId` order.
    fn compute_sites(&self, census: &Census) -> Vec<StagedSite> {
        let sites = &self.sites;
        let ctx = SiteContext::new(&self.grid, census, &self.coefficients);

        #[cfg(not(feature = "parallel"))]
        {
            sites.ids().map(|s| sites.compute_next(s, &ctx)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use bd_core::SiteId;
            use rayon::prelude::*;

            let work = || -> Vec<StagedSite> {
                (0..sites.len() as u32)
                    .into_par_iter()
                    .map(|i| sites.compute_next(SiteId(i), &ctx))
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }

    /// Intents for every active agent, in ascending `AgentId` order.
    fn compute_intents(&mut self, now: Tick) -> Vec<(AgentId, Intent)> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents = &self.agents;
        let ctx    = TickContext::new(now, &self.grid, &self.sites);
        let rngs   = &mut self.rngs;

        #[cfg(not(feature = "parallel"))]
        {
            rngs.inner
                .iter_mut()
                .enumerate()
                .filter_map(|(i, rng)| plan_agent(AgentId::from_index(i), agents, &ctx, rng))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Each agent owns its draw source, so the parallel split changes
            // nothing about which values an agent sees.
            let mut work = || -> Vec<(AgentId, Intent)> {
                rngs.inner
                    .par_iter_mut()
                    .enumerate()
                    .filter_map(|(i, rng)| plan_agent(AgentId::from_index(i), agents, &ctx, rng))
                    .collect()
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }

    /// Apply one agent's intent during the sequential commit phase.
    fn apply_intent(&mut self, agent: AgentId, intent: Intent, now: Tick) -> SimResult<()> {
        debug_assert_eq!(self.phase, Phase::Commit);
        match intent {
            Intent::Burgle { site } => {
                let tally = self.sites.register_burglary(site);
                self.removal_queue.push(agent);
                log::trace!("tick={} {agent} burgled {site} (tally {tally})", now.0);
            }
            Intent::MoveTo(dest) => {
                self.grid.move_agent(agent, dest)?;
            }
            Intent::Stay => {}
        }
        Ok(())
    }

    /// Remove every queued offender from the grid and the active set.
    ///
    /// Runs after all intents are applied so a removal never shifts what
    /// another agent sees within the same tick.
    fn drain_removals(&mut self, now: Tick) -> SimResult<()> {
        for agent in self.removal_queue.drain(..) {
            let pos = self.grid.remove_agent(agent)?;
            self.agents.retire(agent);
            log::trace!("tick={} {agent} removed at {pos}", now.0);
        }
        Ok(())
    }
}

// ── Intent helper ─────────────────────────────────────────────────────────────

/// Decide for one agent; `None` for retired or unplaced agents.
fn plan_agent<D: UnitDraw>(
    agent:  AgentId,
    agents: &AgentStore,
    ctx:    &TickContext<'_>,
    rng:    &mut D,
) -> Option<(AgentId, Intent)> {
    if !agents.is_active(agent) {
        return None;
    }
    let pos = ctx.grid.position_of(agent)?;
    let intent = match agents.kind_of(agent) {
        AgentKind::Offender => offender::decide(pos, ctx, rng),
        AgentKind::Patrol => patrol::plan_move(pos, ctx, rng),
    };
    Some((agent, intent))
}
