//! The five global coefficients of the risk field.
//!
//! | Field     | Symbol | Domain     | Role                                       |
//! |-----------|--------|------------|--------------------------------------------|
//! | `mu`      | μ      | `[0, 1]`   | share of risk exchanged with neighbors     |
//! | `omega`   | ω      | `[0, 1]`   | per-tick risk decay                        |
//! | `theta`   | θ      | `>= 0`     | risk added per offender, scaled by p_s     |
//! | `chi`     | χ      | `>= 0`     | deterrence sensitivity to patrol presence  |
//! | `epsilon` | ε      | `>= 0`     | burglary success scale                     |
//!
//! ε is further capped where `ε/(1 + ε)` would round to exactly 1 in `f64`
//! (around 9·10¹⁵), so the success probability stays in `[0, 1)`.
//!
//! Keeping μ and ω inside `[0, 1]` is what keeps the staged risk level
//! non-negative: `β + μ/4·(B_n − 4β) = (1 − μ)β + μ/4·B_n`.

use crate::{BdError, BdResult};

/// Global, read-only coefficients.  Set once at build time.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coefficients {
    pub mu:      f64,
    pub omega:   f64,
    pub theta:   f64,
    pub chi:     f64,
    pub epsilon: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            mu:      0.2,
            omega:   1.0 / 15.0,
            theta:   0.56,
            chi:     0.5,
            epsilon: 1.0,
        }
    }
}

impl Coefficients {
    /// Check every coefficient against its domain.
    ///
    /// Returns the first violation found, in field order.
    pub fn validate(&self) -> BdResult<()> {
        unit_interval("mu", self.mu)?;
        unit_interval("omega", self.omega)?;
        non_negative("theta", self.theta)?;
        non_negative("chi", self.chi)?;
        non_negative("epsilon", self.epsilon)?;
        // Deterrence peaks at 1 with no patrol present.
        if self.success_prob(1.0) >= 1.0 {
            return Err(BdError::Coefficient {
                name:   "epsilon",
                value:  self.epsilon,
                domain: "small enough that ε/(1 + ε) < 1",
            });
        }
        Ok(())
    }

    /// Deterrence for a cell holding `patrols` patrol units: `exp(−χ·n)`.
    #[inline]
    pub fn deterrence(&self, patrols: u32) -> f64 {
        (-self.chi * patrols as f64).exp()
    }

    /// Saturating map from deterrence to burglary success probability:
    /// `ε·A′′ / (1 + ε·A′′)`.  Always in `[0, 1)` for a valid `ε`.
    #[inline]
    pub fn success_prob(&self, deterrence: f64) -> f64 {
        let scaled = self.epsilon * deterrence;
        scaled / (1.0 + scaled)
    }
}

fn unit_interval(name: &'static str, value: f64) -> BdResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BdError::Coefficient { name, value, domain: "[0, 1]" })
    }
}

fn non_negative(name: &'static str, value: f64) -> BdResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BdError::Coefficient { name, value, domain: ">= 0 and finite" })
    }
}
