//! `SiteField`: Structure-of-Arrays storage for every site's state.
//!
//! Committed arrays are what the rest of the engine reads.  `staged` holds
//! the values produced by the compute phase; they are invisible until
//! [`SiteField::commit`] swaps them in.

use bd_core::{Coefficients, GridPos, SiteId};

use crate::{SiteContext, SiteError, SiteResult, SiteSnapshot};

/// Next-tick values computed for one site, not yet visible to anyone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedSite {
    pub risk:           f64,
    pub attractiveness: f64,
    pub deterrence:     f64,
    pub success_prob:   f64,
}

/// Per-site state, indexed by `SiteId`.
#[derive(Debug, Clone, Default)]
pub struct SiteField {
    pos:                 Vec<GridPos>,
    base_attractiveness: Vec<f64>,

    // ── Committed state ───────────────────────────────────────────────────
    risk:           Vec<f64>,
    attractiveness: Vec<f64>,
    deterrence:     Vec<f64>,
    success_prob:   Vec<f64>,
    burglaries:     Vec<u32>,

    // ── Back buffer ───────────────────────────────────────────────────────
    staged: Vec<Option<StagedSite>>,
}

impl SiteField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a site at `pos` with static `base` attractiveness.
    ///
    /// Starts with zero risk, no patrol presence (deterrence 1) and the
    /// matching success probability `ε / (1 + ε)`.
    pub fn push(&mut self, pos: GridPos, base: f64, coefficients: &Coefficients) -> SiteResult<SiteId> {
        if !base.is_finite() || base < 0.0 {
            return Err(SiteError::InvalidBase { pos, value: base });
        }
        let id = SiteId::from_index(self.pos.len());
        self.pos.push(pos);
        self.base_attractiveness.push(base);
        self.risk.push(0.0);
        self.attractiveness.push(base);
        self.deterrence.push(1.0);
        self.success_prob.push(coefficients.success_prob(1.0));
        self.burglaries.push(0);
        self.staged.push(None);
        Ok(id)
    }

    /// Warm-start a site's risk level before the first tick.
    pub fn seed_risk(&mut self, site: SiteId, risk: f64) -> SiteResult<()> {
        self.check(site)?;
        if !risk.is_finite() || risk < 0.0 {
            return Err(SiteError::InvalidRisk { site, value: risk });
        }
        let i = site.index();
        self.risk[i] = risk;
        self.attractiveness[i] = self.base_attractiveness[i] + risk;
        Ok(())
    }

    fn check(&self, site: SiteId) -> SiteResult<()> {
        if site.index() < self.pos.len() {
            Ok(())
        } else {
            Err(SiteError::UnknownSite(site))
        }
    }

    // ── Size ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Iterator over all `SiteId`s in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = SiteId> + use<> {
        (0..self.pos.len() as u32).map(SiteId)
    }

    // ── Committed reads ───────────────────────────────────────────────────

    #[inline]
    pub fn pos(&self, site: SiteId) -> GridPos {
        self.pos[site.index()]
    }

    #[inline]
    pub fn base_attractiveness(&self, site: SiteId) -> f64 {
        self.base_attractiveness[site.index()]
    }

    #[inline]
    pub fn risk(&self, site: SiteId) -> f64 {
        self.risk[site.index()]
    }

    #[inline]
    pub fn attractiveness(&self, site: SiteId) -> f64 {
        self.attractiveness[site.index()]
    }

    #[inline]
    pub fn deterrence(&self, site: SiteId) -> f64 {
        self.deterrence[site.index()]
    }

    #[inline]
    pub fn success_prob(&self, site: SiteId) -> f64 {
        self.success_prob[site.index()]
    }

    #[inline]
    pub fn burglaries(&self, site: SiteId) -> u32 {
        self.burglaries[site.index()]
    }

    /// Committed risk levels, indexed by `SiteId`.
    #[inline]
    pub fn risks(&self) -> &[f64] {
        &self.risk
    }

    pub fn total_burglaries(&self) -> u64 {
        self.burglaries.iter().map(|&n| n as u64).sum()
    }

    pub fn mean_risk(&self) -> f64 {
        if self.risk.is_empty() {
            0.0
        } else {
            self.risk.iter().sum::<f64>() / self.risk.len() as f64
        }
    }

    pub fn max_risk(&self) -> f64 {
        self.risk.iter().copied().fold(0.0, f64::max)
    }

    /// Committed state of one site.
    pub fn snapshot_of(&self, site: SiteId) -> SiteSnapshot {
        let i = site.index();
        SiteSnapshot {
            site,
            pos:                 self.pos[i],
            base_attractiveness: self.base_attractiveness[i],
            risk:                self.risk[i],
            attractiveness:      self.attractiveness[i],
            deterrence:          self.deterrence[i],
            success_prob:        self.success_prob[i],
            burglaries:          self.burglaries[i],
        }
    }

    /// Committed state of every site, in `SiteId` order.
    pub fn snapshot(&self) -> Vec<SiteSnapshot> {
        self.ids().map(|s| self.snapshot_of(s)).collect()
    }

    // ── Compute phase ─────────────────────────────────────────────────────

    /// Compute next-tick values for `site` from committed state only.
    ///
    /// Pure: takes `&self`, so any number of sites may be computed in
    /// parallel.  The result must be handed back through [`stage`] or
    /// [`stage_all`].
    ///
    /// [`stage`]: Self::stage
    /// [`stage_all`]: Self::stage_all
    pub fn compute_next(&self, site: SiteId, ctx: &SiteContext<'_>) -> StagedSite {
        let c = ctx.coefficients;
        let i = site.index();
        let pos = self.pos[i];
        let beta = self.risk[i];

        let neighbor_risk: f64 = ctx
            .grid
            .orthogonal_sites(pos)
            .map(|(_, n)| self.risk[n.index()])
            .sum();

        let offenders = ctx.census.offenders_at(pos) as f64;
        let patrols = ctx.census.patrols_at(pos);

        let diffused = beta + (c.mu / 4.0) * (neighbor_risk - 4.0 * beta);
        let risk = diffused * (1.0 - c.omega) + c.theta * self.success_prob[i] * offenders;
        let deterrence = c.deterrence(patrols);

        StagedSite {
            risk,
            attractiveness: risk + self.base_attractiveness[i],
            deterrence,
            success_prob: c.success_prob(deterrence),
        }
    }

    /// Store the compute-phase result for one site.
    #[inline]
    pub fn stage(&mut self, site: SiteId, staged: StagedSite) {
        self.staged[site.index()] = Some(staged);
    }

    /// Store compute-phase results for every site, in `SiteId` order.
    pub fn stage_all(&mut self, staged: Vec<StagedSite>) {
        debug_assert_eq!(staged.len(), self.len());
        for (slot, s) in self.staged.iter_mut().zip(staged) {
            *slot = Some(s);
        }
    }

    /// Sequential compute phase over every site.
    pub fn compute_all(&mut self, ctx: &SiteContext<'_>) {
        let staged: Vec<StagedSite> = self.ids().map(|s| self.compute_next(s, ctx)).collect();
        self.stage_all(staged);
    }

    /// `true` if `site` has a staged update waiting for commit.
    #[inline]
    pub fn is_staged(&self, site: SiteId) -> bool {
        self.staged[site.index()].is_some()
    }

    // ── Commit phase ──────────────────────────────────────────────────────

    /// Adopt the staged values for `site` and clear its burglary tally.
    ///
    /// A site with nothing staged keeps its committed values.  A staged
    /// risk that overflowed is refused and left staged.
    pub fn commit(&mut self, site: SiteId) -> SiteResult<()> {
        let i = site.index();
        if let Some(s) = self.staged[i] {
            check_staged(site, &s)?;
            debug_assert!((0.0..1.0).contains(&s.success_prob), "p_s out of range at {site}");
            self.staged[i] = None;
            self.risk[i] = s.risk;
            self.attractiveness[i] = s.attractiveness;
            self.deterrence[i] = s.deterrence;
            self.success_prob[i] = s.success_prob;
        }
        self.burglaries[i] = 0;
        Ok(())
    }

    /// Commit every site.
    ///
    /// Every staged value is checked before any is adopted, so on error the
    /// committed field is untouched.
    pub fn commit_all(&mut self) -> SiteResult<()> {
        for (i, staged) in self.staged.iter().enumerate() {
            if let Some(s) = staged {
                check_staged(SiteId::from_index(i), s)?;
            }
        }
        for site in self.ids() {
            self.commit(site)?;
        }
        Ok(())
    }

    /// Record a completed burglary at `site`.  Returns the new tally.
    ///
    /// Only the commit phase calls this, after `commit_all`, so the tally
    /// counts burglaries of the tick just committed.
    #[inline]
    pub fn register_burglary(&mut self, site: SiteId) -> u32 {
        let n = &mut self.burglaries[site.index()];
        *n += 1;
        *n
    }
}

/// Risk must stay finite: an overflowed level turns into NaN on the next
/// diffusion step.
fn check_staged(site: SiteId, staged: &StagedSite) -> SiteResult<()> {
    if staged.risk.is_finite() && staged.risk >= 0.0 && staged.attractiveness.is_finite() {
        Ok(())
    } else {
        Err(SiteError::NonFiniteRisk { site, value: staged.risk })
    }
}
