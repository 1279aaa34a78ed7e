//! Unit and scenario tests for bd-sim.

use bd_agent::{AgentRngs, AgentStore};
use bd_core::{AgentId, AgentKind, Coefficients, FixedDraws, GridPos, SimConfig, Tick, UnitDraw};
use bd_site::{SiteError, SiteField};
use bd_spatial::{Grid, GridSpec, SpatialError};

use crate::{NoopObserver, Phase, Sim, SimBuilder, SimError, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn p(x: u32, y: u32) -> GridPos {
    GridPos::new(x, y)
}

fn config(total_ticks: u64) -> SimConfig {
    SimConfig { total_ticks, seed: 42, num_threads: None, output_interval_ticks: 0 }
}

/// ε = 9 with no patrols gives p_s = 0.9.
fn eager() -> Coefficients {
    Coefficients { epsilon: 9.0, ..Coefficients::default() }
}

fn random_sim(seed: u64) -> Sim {
    SimBuilder::new(
        SimConfig { seed, ..config(40) },
        Coefficients::default(),
        GridSpec::bounded(12, 12),
    )
    .uniform_sites(1.0)
    .offenders(40)
    .patrols(6)
    .build()
    .unwrap()
}

fn positions<D: UnitDraw + Send>(sim: &Sim<D>) -> Vec<Option<GridPos>> {
    sim.agents().agent_ids().map(|a| sim.position_of(a)).collect()
}

/// Observer that counts every hook.
#[derive(Default)]
struct Counter {
    starts:    Vec<Tick>,
    summaries: Vec<TickSummary>,
    snapshots: Vec<(Tick, usize, usize)>,
    ended:     Option<Tick>,
}

impl SimObserver for Counter {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }

    fn on_snapshot(&mut self, tick: Tick, sites: &SiteField, grid: &Grid, _agents: &AgentStore) {
        self.snapshots.push((tick, sites.len(), grid.agents_placed()));
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn offender_burgles_centre_and_leaves() {
        init_logger();
        let mut sim = SimBuilder::new(config(1), eager(), GridSpec::bounded(3, 3))
            .uniform_sites(1.0)
            .offender_at(p(1, 1))
            .with_draws(vec![FixedDraws::constant(0.05)])
            .build()
            .unwrap();

        let summary = sim.tick().unwrap();
        assert_eq!(summary.burglaries, 1);
        assert_eq!(sim.burglaries_this_tick(), 1);
        assert_eq!(summary.active_offenders, 0);
        assert_eq!(sim.position_of(AgentId(0)), None);
        assert!(!sim.agents().is_active(AgentId(0)));

        let centre = sim.grid().site_at(p(1, 1)).unwrap();
        assert_eq!(sim.sites().burglaries(centre), 1);
        // The offender still counted in this tick's census: θ·p_s·1.
        assert!((sim.sites().risk(centre) - 0.56 * 0.9).abs() < 1e-12);
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn patrol_moves_to_only_attractive_neighbor() {
        let mut sim = SimBuilder::new(config(2), Coefficients::default(), GridSpec::bounded(2, 1))
            .site(p(0, 0), 0.0)
            .site(p(1, 0), 5.0)
            .patrol_at(p(0, 0))
            .with_draws(vec![FixedDraws::constant(0.3)])
            .build()
            .unwrap();

        sim.tick().unwrap();
        assert_eq!(sim.position_of(AgentId(0)), Some(p(1, 0)));

        // Way back has weight 0: the patrol stays put.
        sim.tick().unwrap();
        assert_eq!(sim.position_of(AgentId(0)), Some(p(1, 0)));
    }

    #[test]
    fn offender_crosses_empty_lot_then_burgles() {
        let mut sim = SimBuilder::new(config(2), Coefficients::default(), GridSpec::bounded(2, 1))
            .site(p(1, 0), 1.0)
            .offender_at(p(0, 0))
            .with_draws(vec![FixedDraws::constant(0.0)])
            .build()
            .unwrap();

        assert_eq!(sim.tick().unwrap().burglaries, 0);
        assert_eq!(sim.position_of(AgentId(0)), Some(p(1, 0)));

        assert_eq!(sim.tick().unwrap().burglaries, 1);
        assert_eq!(sim.position_of(AgentId(0)), None);
    }

    #[test]
    fn tallies_count_one_tick_only() {
        let mut sim = SimBuilder::new(config(2), eager(), GridSpec::bounded(1, 1))
            .uniform_sites(1.0)
            .offender_at(p(0, 0))
            .offender_at(p(0, 0))
            .with_draws(vec![FixedDraws::constant(0.05); 2])
            .build()
            .unwrap();

        assert_eq!(sim.tick().unwrap().burglaries, 2);
        let site = sim.grid().site_at(p(0, 0)).unwrap();
        assert_eq!(sim.sites().burglaries(site), 2);

        assert_eq!(sim.tick().unwrap().burglaries, 0);
        assert_eq!(sim.sites().burglaries(site), 0);
        assert_eq!(sim.total_burglaries(), 2);
    }

    #[test]
    fn isolated_offender_never_moves() {
        // Only one site on the grid and a draw above p_s = 0.5: the offender
        // takes the move branch every tick and has nowhere to go.
        let mut sim = SimBuilder::new(config(100), Coefficients::default(), GridSpec::bounded(3, 3))
            .site(p(1, 1), 1.0)
            .offender_at(p(1, 1))
            .with_draws(vec![FixedDraws::constant(0.99)])
            .build()
            .unwrap();

        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.position_of(AgentId(0)), Some(p(1, 1)));
        assert_eq!(sim.total_burglaries(), 0);
        assert_eq!(sim.current_tick(), Tick(100));
    }

    #[test]
    fn risk_field_is_row_major() {
        let sim = SimBuilder::new(config(0), Coefficients::default(), GridSpec::bounded(2, 2))
            .site(p(1, 1), 0.0)
            .initial_risk(p(1, 1), 2.0)
            .build()
            .unwrap();
        assert_eq!(sim.risk_field(), vec![0.0, 0.0, 0.0, 2.0]);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_loop {
    use super::*;

    #[test]
    fn observer_hooks_fire_in_order() {
        let cfg = SimConfig { output_interval_ticks: 2, ..config(5) };
        let mut sim = SimBuilder::new(cfg, Coefficients::default(), GridSpec::bounded(4, 4))
            .uniform_sites(1.0)
            .offenders(3)
            .patrols(1)
            .build()
            .unwrap();

        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();

        assert_eq!(obs.starts, (0..5).map(Tick).collect::<Vec<_>>());
        assert_eq!(obs.summaries.len(), 5);
        assert_eq!(obs.summaries[4].tick, Tick(4));
        let snap_ticks: Vec<Tick> = obs.snapshots.iter().map(|s| s.0).collect();
        assert_eq!(snap_ticks, vec![Tick(0), Tick(2), Tick(4)]);
        assert!(obs.snapshots.iter().all(|s| s.1 == 16));
        assert_eq!(obs.ended, Some(Tick(5)));

        // Already at the end: another run only reports the end.
        let mut again = Counter::default();
        sim.run(&mut again).unwrap();
        assert!(again.starts.is_empty());
        assert_eq!(again.ended, Some(Tick(5)));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = SimBuilder::new(config(1), Coefficients::default(), GridSpec::bounded(3, 3))
            .uniform_sites(1.0)
            .patrols(2)
            .build()
            .unwrap();
        sim.run_ticks(4, &mut NoopObserver).unwrap();
        assert_eq!(sim.current_tick(), Tick(4));
        assert_eq!(sim.last_summary().tick, Tick(3));
    }

    #[test]
    fn offender_count_tracks_burglaries() {
        let mut sim = random_sim(3);
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();

        let burgled: u64 = obs.summaries.iter().map(|s| s.burglaries).sum();
        let last = obs.summaries.last().unwrap();
        assert_eq!(burgled, sim.total_burglaries());
        assert_eq!(last.active_offenders as u64 + burgled, 40);
        assert_eq!(last.patrols, 6);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;

    #[test]
    fn same_seed_same_history() {
        let mut a = random_sim(7);
        let mut b = random_sim(7);
        assert_eq!(positions(&a), positions(&b));
        for _ in 0..40 {
            let sa = a.tick().unwrap();
            let sb = b.tick().unwrap();
            assert_eq!(sa, sb);
            assert_eq!(positions(&a), positions(&b));
        }
        assert_eq!(a.sites().risks(), b.sites().risks());
    }

    #[test]
    fn agents_move_at_most_one_cell_per_tick() {
        let mut sim = random_sim(11);
        for _ in 0..40 {
            let before = positions(&sim);
            let summary = sim.tick().unwrap();
            let after = positions(&sim);

            let mut removed = 0;
            for (i, (was, now)) in before.iter().zip(&after).enumerate() {
                match (was, now) {
                    (Some(a), Some(b)) => assert!(a.manhattan(*b) <= 1, "agent {i} jumped {a} -> {b}"),
                    (Some(a), None) => {
                        // Only an offender standing on a site can leave.
                        assert_eq!(sim.agents().kind_of(AgentId::from_index(i)), AgentKind::Offender);
                        assert!(sim.grid().site_at(*a).is_some());
                        removed += 1;
                    }
                    (None, Some(_)) => panic!("agent {i} came back"),
                    (None, None) => {}
                }
            }
            assert_eq!(removed, summary.burglaries);
        }
    }

    #[test]
    fn committed_values_stay_in_bounds() {
        let c = Coefficients { mu: 0.9, omega: 0.05, theta: 2.0, chi: 0.3, epsilon: 4.0 };
        let mut sim = SimBuilder::new(config(60), c, GridSpec::bounded(10, 10))
            .uniform_sites(0.5)
            .offenders(60)
            .patrols(10)
            .build()
            .unwrap();

        for _ in 0..60 {
            sim.tick().unwrap();
            let sites = sim.sites();
            for s in sites.ids() {
                assert!(sites.risk(s) >= 0.0);
                assert!(sites.attractiveness(s) >= sites.base_attractiveness(s));
                assert!((0.0..1.0).contains(&sites.success_prob(s)));
            }
        }
    }

    #[test]
    fn torus_runs_keep_agents_on_grid() {
        let spec = GridSpec { width: 5, height: 4, topology: bd_spatial::Topology::Torus };
        let mut sim = SimBuilder::new(config(30), Coefficients::default(), spec)
            .uniform_sites(1.0)
            .offenders(10)
            .patrols(3)
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        for pos in positions(&sim).into_iter().flatten() {
            assert!(sim.grid().contains(pos));
        }
    }

    #[test]
    fn overflowing_risk_aborts_tick_without_committing() {
        init_logger();
        let c = Coefficients { theta: 1e308, ..eager() };
        let mut sim = SimBuilder::new(config(5), c, GridSpec::bounded(2, 1))
            .uniform_sites(1.0)
            .offender_at(p(0, 0))
            .offender_at(p(0, 0))
            .with_draws(vec![FixedDraws::constant(0.99); 2])
            .build()
            .unwrap();
        let hot = sim.grid().site_at(p(0, 0)).unwrap();

        // 1e308 · 0.9 · 2 overflows to inf.
        match sim.tick() {
            Err(SimError::Site(SiteError::NonFiniteRisk { site, value })) => {
                assert_eq!(site, hot);
                assert!(value.is_infinite());
            }
            other => panic!("expected non-finite risk, got {other:?}"),
        }
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.current_tick(), Tick::ZERO);
        assert!(sim.sites().risks().iter().all(|&r| r == 0.0));
        assert_eq!(sim.position_of(AgentId(0)), Some(p(0, 0)));
    }

    #[test]
    fn default_draws_match_seeded_agent_rngs() {
        let mut seeded = random_sim(7);
        let n = seeded.agents().count;
        let mut explicit = SimBuilder::new(
            SimConfig { seed: 7, ..config(40) },
            Coefficients::default(),
            GridSpec::bounded(12, 12),
        )
        .uniform_sites(1.0)
        .offenders(40)
        .patrols(6)
        .with_draws(AgentRngs::seeded(n, 7).inner)
        .build()
        .unwrap();

        for _ in 0..20 {
            assert_eq!(seeded.tick().unwrap(), explicit.tick().unwrap());
            assert_eq!(positions(&seeded), positions(&explicit));
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn thread_count_does_not_change_results() {
        let build = |threads| {
            SimBuilder::new(
                SimConfig { num_threads: Some(threads), ..config(30) },
                Coefficients::default(),
                GridSpec::bounded(16, 16),
            )
            .uniform_sites(1.0)
            .offenders(80)
            .patrols(8)
            .build()
            .unwrap()
        };
        let mut one = build(1);
        let mut many = build(4);
        for _ in 0..30 {
            assert_eq!(one.tick().unwrap(), many.tick().unwrap());
            assert_eq!(positions(&one), positions(&many));
        }
        assert_eq!(one.sites().risks(), many.sites().risks());
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    fn base() -> SimBuilder {
        SimBuilder::new(config(1), Coefficients::default(), GridSpec::bounded(3, 3))
    }

    #[test]
    fn rejects_bad_coefficients() {
        let c = Coefficients { mu: 1.5, ..Coefficients::default() };
        let err = SimBuilder::new(config(1), c, GridSpec::bounded(3, 3)).build().err();
        assert!(matches!(err, Some(SimError::Core(_))));
    }

    #[test]
    fn rejects_epsilon_that_saturates_success() {
        let c = Coefficients { epsilon: 1e17, ..Coefficients::default() };
        let err = SimBuilder::new(config(1), c, GridSpec::bounded(3, 3))
            .uniform_sites(1.0)
            .build()
            .err();
        assert!(matches!(
            err,
            Some(SimError::Core(bd_core::BdError::Coefficient { name: "epsilon", .. }))
        ));
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = SimBuilder::new(config(1), Coefficients::default(), GridSpec::bounded(0, 3))
            .build()
            .err();
        assert!(matches!(err, Some(SimError::Spatial(SpatialError::InvalidDimensions { .. }))));
    }

    #[test]
    fn rejects_site_outside_grid() {
        let err = base().site(p(3, 0), 1.0).build().err();
        assert!(matches!(err, Some(SimError::Spatial(SpatialError::OutOfBounds { .. }))));
    }

    #[test]
    fn rejects_duplicate_site() {
        let err = base().site(p(1, 1), 1.0).site(p(1, 1), 2.0).build().err();
        assert!(matches!(err, Some(SimError::Spatial(SpatialError::SiteCollision { .. }))));
    }

    #[test]
    fn rejects_negative_base() {
        let err = base().site(p(1, 1), -0.1).build().err();
        assert!(matches!(err, Some(SimError::Site(_))));
    }

    #[test]
    fn rejects_risk_on_empty_lot() {
        let err = base().site(p(0, 0), 1.0).initial_risk(p(2, 2), 1.0).build().err();
        assert!(matches!(err, Some(SimError::NoSiteAt(pos)) if pos == p(2, 2)));
    }

    #[test]
    fn rejects_agent_outside_grid() {
        let err = base().uniform_sites(1.0).patrol_at(p(0, 9)).build().err();
        assert!(matches!(err, Some(SimError::Spatial(SpatialError::OutOfBounds { .. }))));
    }

    #[test]
    fn rejects_draw_count_mismatch() {
        let err = base()
            .uniform_sites(1.0)
            .offenders(2)
            .with_draws(vec![FixedDraws::constant(0.5)])
            .build()
            .err();
        assert!(matches!(
            err,
            Some(SimError::AgentCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_threads() {
        let cfg = SimConfig { num_threads: Some(0), ..config(1) };
        let err = SimBuilder::new(cfg, Coefficients::default(), GridSpec::bounded(3, 3))
            .build()
            .err();
        assert!(matches!(err, Some(SimError::Config(_))));
    }

    #[test]
    fn explicit_sites_then_uniform_fill() {
        let sim = base().site(p(2, 2), 3.0).uniform_sites(1.0).build().unwrap();
        let sites = sim.sites();
        assert_eq!(sites.len(), 9);
        let corner = sim.grid().site_at(p(2, 2)).unwrap();
        assert_eq!(corner.0, 0);
        assert_eq!(sites.base_attractiveness(corner), 3.0);
        assert_eq!(sites.pos(bd_core::SiteId(1)), p(0, 0));
    }

    #[test]
    fn explicit_agents_take_first_ids() {
        let sim = base()
            .uniform_sites(1.0)
            .offenders(2)
            .offender_at(p(2, 1))
            .patrol_at(p(0, 2))
            .patrols(1)
            .build()
            .unwrap();
        assert_eq!(sim.agents().count, 5);
        assert_eq!(sim.position_of(AgentId(0)), Some(p(2, 1)));
        assert_eq!(sim.agents().kind_of(AgentId(2)), AgentKind::Offender);
        assert_eq!(sim.position_of(AgentId(3)), Some(p(0, 2)));
        assert_eq!(sim.agents().kind_of(AgentId(4)), AgentKind::Patrol);
        assert_eq!(sim.grid().agents_placed(), 5);
    }

    #[test]
    fn placement_may_land_on_empty_lots() {
        // No sites at all: every agent still gets a cell.
        let sim = base().offenders(20).build().unwrap();
        assert!(positions(&sim).iter().all(|p| p.is_some()));
        assert!(sim.sites().is_empty());
    }
}
