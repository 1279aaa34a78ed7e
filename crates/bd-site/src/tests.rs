//! Unit tests for bd-site.

use bd_core::{AgentId, AgentKind, Coefficients, GridPos, SiteId};
use bd_spatial::{Grid, GridSpec, Topology};

use crate::{SiteContext, SiteError, SiteField};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: u32, y: u32) -> GridPos {
    GridPos::new(x, y)
}

fn coeffs(mu: f64, omega: f64, theta: f64) -> Coefficients {
    Coefficients { mu, omega, theta, chi: 0.5, epsilon: 1.0 }
}

/// Grid + field with a site of `base` on every cell, ids row-major.
fn uniform(spec: GridSpec, base: f64, c: &Coefficients) -> (Grid, SiteField) {
    let mut grid = Grid::new(spec).unwrap();
    let mut field = SiteField::new();
    let positions: Vec<GridPos> = grid.positions().collect();
    for pos in positions {
        let id = field.push(pos, base, c).unwrap();
        grid.place_site(id, pos).unwrap();
    }
    (grid, field)
}

fn step(grid: &Grid, field: &mut SiteField, c: &Coefficients) {
    let census = grid.census();
    let ctx = SiteContext::new(grid, &census, c);
    field.compute_all(&ctx);
    field.commit_all().unwrap();
}

fn site_at(grid: &Grid, pos: GridPos) -> SiteId {
    grid.site_at(pos).unwrap()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn initial_state() {
        let c = Coefficients { epsilon: 9.0, ..Coefficients::default() };
        let mut field = SiteField::new();
        let s = field.push(p(0, 0), 2.5, &c).unwrap();
        assert_eq!(field.risk(s), 0.0);
        assert_eq!(field.attractiveness(s), 2.5);
        assert_eq!(field.deterrence(s), 1.0);
        assert!((field.success_prob(s) - 0.9).abs() < 1e-12);
        assert_eq!(field.burglaries(s), 0);
    }

    #[test]
    fn invalid_base_rejected() {
        let c = Coefficients::default();
        let mut field = SiteField::new();
        assert!(matches!(
            field.push(p(0, 0), -1.0, &c),
            Err(SiteError::InvalidBase { .. })
        ));
        assert!(field.push(p(0, 0), f64::NAN, &c).is_err());
        assert!(field.is_empty());
    }

    #[test]
    fn seed_risk_updates_attractiveness() {
        let c = Coefficients::default();
        let mut field = SiteField::new();
        let s = field.push(p(0, 0), 1.0, &c).unwrap();
        field.seed_risk(s, 3.0).unwrap();
        assert_eq!(field.attractiveness(s), 4.0);
        assert!(field.seed_risk(s, -0.5).is_err());
        assert!(matches!(
            field.seed_risk(SiteId(9), 1.0),
            Err(SiteError::UnknownSite(_))
        ));
    }
}

// ── Update rule ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod update_rule {
    use super::*;

    #[test]
    fn diffusion_matches_formula() {
        let c = coeffs(0.2, 0.1, 0.0);
        let (grid, mut field) = uniform(GridSpec::bounded(3, 3), 1.0, &c);
        let centre = site_at(&grid, p(1, 1));
        field.seed_risk(centre, 1.0).unwrap();

        step(&grid, &mut field, &c);

        // Centre: (1 + 0.05·(0 − 4))·0.9 = 0.72
        assert!((field.risk(centre) - 0.72).abs() < 1e-12);
        assert!((field.attractiveness(centre) - 1.72).abs() < 1e-12);
        // Orthogonal neighbor: (0 + 0.05·1)·0.9 = 0.045
        let north = site_at(&grid, p(1, 0));
        assert!((field.risk(north) - 0.045).abs() < 1e-12);
        // Diagonal neighbor sees nothing.
        assert_eq!(field.risk(site_at(&grid, p(0, 0))), 0.0);
    }

    #[test]
    fn missing_neighbor_site_contributes_zero() {
        let c = coeffs(0.4, 0.0, 0.0);
        let mut grid = Grid::new(GridSpec::bounded(3, 1)).unwrap();
        let mut field = SiteField::new();
        // (0,0) and (1,0) hold sites; (2,0) is an empty lot.
        let a = field.push(p(0, 0), 0.0, &c).unwrap();
        let b = field.push(p(1, 0), 0.0, &c).unwrap();
        grid.place_site(a, p(0, 0)).unwrap();
        grid.place_site(b, p(1, 0)).unwrap();
        field.seed_risk(a, 2.0).unwrap();

        step(&grid, &mut field, &c);

        // b: 0 + 0.1·(2 − 0) = 0.2
        assert!((field.risk(b) - 0.2).abs() < 1e-12);
        // a: 2 + 0.1·(0 − 8) = 1.2
        assert!((field.risk(a) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn offenders_amplify_risk() {
        let c = coeffs(0.0, 0.0, 0.56); // ε = 1 → p_s = 0.5
        let (mut grid, mut field) = uniform(GridSpec::bounded(2, 1), 0.0, &c);
        grid.place_agent(AgentId(0), AgentKind::Offender, p(0, 0)).unwrap();
        grid.place_agent(AgentId(1), AgentKind::Offender, p(0, 0)).unwrap();

        step(&grid, &mut field, &c);

        let s = site_at(&grid, p(0, 0));
        assert!((field.risk(s) - 0.56 * 0.5 * 2.0).abs() < 1e-12);
        assert_eq!(field.risk(site_at(&grid, p(1, 0))), 0.0);
    }

    #[test]
    fn patrols_deter() {
        let c = coeffs(0.0, 0.0, 0.0);
        let (mut grid, mut field) = uniform(GridSpec::bounded(2, 1), 0.0, &c);
        grid.place_agent(AgentId(0), AgentKind::Patrol, p(1, 0)).unwrap();
        grid.place_agent(AgentId(1), AgentKind::Patrol, p(1, 0)).unwrap();

        step(&grid, &mut field, &c);

        let s = site_at(&grid, p(1, 0));
        let expected = (-1.0f64).exp(); // exp(−0.5·2)
        assert!((field.deterrence(s) - expected).abs() < 1e-12);
        assert!((field.success_prob(s) - expected / (1.0 + expected)).abs() < 1e-12);
        // Unpatrolled cell keeps full deterrence value 1.
        assert_eq!(field.deterrence(site_at(&grid, p(0, 0))), 1.0);
    }
}

// ── Double buffering ──────────────────────────────────────────────────────────

#[cfg(test)]
mod staging {
    use super::*;

    #[test]
    fn staged_values_invisible_until_commit() {
        let c = coeffs(0.5, 0.0, 0.0);
        let (grid, mut field) = uniform(GridSpec::bounded(3, 3), 0.0, &c);
        let centre = site_at(&grid, p(1, 1));
        field.seed_risk(centre, 4.0).unwrap();

        let census = grid.census();
        let ctx = SiteContext::new(&grid, &census, &c);
        field.compute_all(&ctx);

        assert!(field.is_staged(centre));
        assert_eq!(field.risk(centre), 4.0);
        assert_eq!(field.risk(site_at(&grid, p(1, 0))), 0.0);

        field.commit_all().unwrap();
        assert!(!field.is_staged(centre));
        assert!(field.risk(centre) < 4.0);
    }

    #[test]
    fn update_order_does_not_matter() {
        let c = coeffs(0.3, 0.05, 0.2);
        let (grid, mut forward) = uniform(GridSpec::bounded(4, 4), 1.0, &c);
        forward.seed_risk(SiteId(5), 2.0).unwrap();
        forward.seed_risk(SiteId(10), 0.7).unwrap();
        let mut reverse = forward.clone();

        let census = grid.census();
        let ctx = SiteContext::new(&grid, &census, &c);

        forward.compute_all(&ctx);
        let ids: Vec<SiteId> = reverse.ids().collect();
        for &s in ids.iter().rev() {
            let staged = reverse.compute_next(s, &ctx);
            reverse.stage(s, staged);
        }

        forward.commit_all().unwrap();
        for &s in ids.iter().rev() {
            reverse.commit(s).unwrap();
        }
        assert_eq!(forward.risks(), reverse.risks());
    }

    #[test]
    fn commit_resets_burglary_tally() {
        let c = Coefficients::default();
        let (grid, mut field) = uniform(GridSpec::bounded(1, 1), 1.0, &c);
        let s = site_at(&grid, p(0, 0));
        assert_eq!(field.register_burglary(s), 1);
        assert_eq!(field.register_burglary(s), 2);
        assert_eq!(field.total_burglaries(), 2);

        field.commit(s).unwrap();
        assert_eq!(field.burglaries(s), 0);
    }

    #[test]
    fn commit_refuses_overflowed_risk() {
        let c = Coefficients { theta: 1e308, epsilon: 9.0, ..Coefficients::default() };
        let (mut grid, mut field) = uniform(GridSpec::bounded(2, 1), 0.0, &c);
        grid.place_agent(AgentId(0), AgentKind::Offender, p(0, 0)).unwrap();
        grid.place_agent(AgentId(1), AgentKind::Offender, p(0, 0)).unwrap();

        let census = grid.census();
        let ctx = SiteContext::new(&grid, &census, &c);
        field.compute_all(&ctx);

        let hot = site_at(&grid, p(0, 0));
        assert!(matches!(
            field.commit_all(),
            Err(SiteError::NonFiniteRisk { site, .. }) if site == hot
        ));
        // Nothing adopted, not even the finite neighbor.
        assert_eq!(field.risks(), &[0.0, 0.0]);
        assert!(field.is_staged(site_at(&grid, p(1, 0))));
        assert!(field.commit(hot).is_err());
    }

    #[test]
    fn commit_without_staging_keeps_values() {
        let c = Coefficients::default();
        let (grid, mut field) = uniform(GridSpec::bounded(1, 1), 1.0, &c);
        let s = site_at(&grid, p(0, 0));
        field.seed_risk(s, 0.25).unwrap();
        field.commit(s).unwrap();
        assert_eq!(field.risk(s), 0.25);
    }
}

// ── Long-run behavior ─────────────────────────────────────────────────────────

#[cfg(test)]
mod long_run {
    use super::*;

    #[test]
    fn torus_smooths_to_uniform_level() {
        // No decay, no agents, conserved total on a torus: every site tends
        // to the mean of the initial field.
        let c = coeffs(0.5, 0.0, 0.0);
        let spec = GridSpec { width: 5, height: 5, topology: Topology::Torus };
        let (grid, mut field) = uniform(spec, 1.0, &c);
        field.seed_risk(site_at(&grid, p(2, 2)), 10.0).unwrap();

        let mut prev_max = field.max_risk();
        for _ in 0..300 {
            step(&grid, &mut field, &c);
            let max = field.max_risk();
            assert!(max <= prev_max + 1e-12, "single-site runaway: {max} > {prev_max}");
            prev_max = max;
        }
        for &r in field.risks() {
            assert!((r - 0.4).abs() < 1e-6, "expected 0.4, got {r}");
        }
    }

    #[test]
    fn bounded_grid_spreads_symmetrically_and_flattens() {
        // Default edge policy: missing neighbors count as zero risk.
        let c = coeffs(0.5, 0.0, 0.0);
        let (grid, mut field) = uniform(GridSpec::bounded(5, 5), 1.0, &c);
        field.seed_risk(site_at(&grid, p(2, 2)), 10.0).unwrap();

        let spread = |f: &SiteField| {
            let min = f.risks().iter().copied().fold(f64::INFINITY, f64::min);
            f.max_risk() - min
        };
        let mut prev_spread = spread(&field);
        let mut prev_max = field.max_risk();
        for _ in 0..300 {
            step(&grid, &mut field, &c);
            let (s, max) = (spread(&field), field.max_risk());
            assert!(s <= prev_spread + 1e-12, "spread grew: {s} > {prev_spread}");
            assert!(max <= prev_max + 1e-12, "single-site runaway: {max} > {prev_max}");
            (prev_spread, prev_max) = (s, max);

            for y in 0..5 {
                for x in 0..5 {
                    let r = field.risk(site_at(&grid, p(x, y)));
                    assert!((r - field.risk(site_at(&grid, p(4 - x, y)))).abs() < 1e-12);
                    assert!((r - field.risk(site_at(&grid, p(y, x)))).abs() < 1e-12);
                }
            }
        }
        assert!(prev_spread < 1e-6, "field did not flatten: spread {prev_spread}");
    }

    #[test]
    fn bounded_edges_leak_risk() {
        let c = coeffs(0.5, 0.0, 0.0);
        let (grid, mut field) = uniform(GridSpec::bounded(3, 3), 0.0, &c);
        for s in field.ids().collect::<Vec<_>>() {
            field.seed_risk(s, 1.0).unwrap();
        }
        let before: f64 = field.risks().iter().sum();
        step(&grid, &mut field, &c);
        let after: f64 = field.risks().iter().sum();
        assert!(after < before);
        assert!(field.risks().iter().all(|&r| r >= 0.0));
    }

    #[test]
    fn bounds_hold_under_forcing() {
        let c = Coefficients { mu: 1.0, omega: 0.3, theta: 5.0, chi: 2.0, epsilon: 50.0 };
        let (mut grid, mut field) = uniform(GridSpec::bounded(4, 4), 0.5, &c);
        grid.place_agent(AgentId(0), AgentKind::Offender, p(0, 0)).unwrap();
        grid.place_agent(AgentId(1), AgentKind::Patrol, p(0, 0)).unwrap();
        grid.place_agent(AgentId(2), AgentKind::Offender, p(3, 3)).unwrap();

        for _ in 0..50 {
            step(&grid, &mut field, &c);
            for s in field.ids() {
                assert!(field.risk(s) >= 0.0);
                assert!(field.attractiveness(s) >= field.base_attractiveness(s));
                assert!((0.0..1.0).contains(&field.success_prob(s)));
            }
        }
    }
}
