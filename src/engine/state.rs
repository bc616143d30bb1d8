//! Progression state and the quantities derived from it.
//!
//! Only base facts are stored: the balance, lifetime counters and owned
//! item levels. Every multiplier is recomputed from the catalog on demand,
//! so stored state can never drift out of sync with the effect stack.

use std::collections::BTreeMap;

use super::catalog::{CapPool, Catalog, EffectKind, LevelCap, CAP_STEP, TIER_BASE_CAP};

/// Critical hit chance before any upgrades.
pub const BASE_CRIT_CHANCE: f64 = 0.25;
/// Critical hit chance never exceeds this.
pub const CRIT_CHANCE_CEILING: f64 = 0.5;
/// Critical yield factor before any upgrades.
pub const BASE_CRIT_FACTOR: f64 = 2.0;
/// Critical yield factor never exceeds this.
pub const CRIT_FACTOR_CEILING: f64 = 10.0;

/// Full progression state of one run (plus the prestige carry-over).
#[derive(Clone, Debug)]
pub struct ProgressionState {
    /// Spendable energy.
    pub balance: f64,
    /// Energy earned since the last prestige reset (never decreases on spend).
    pub lifetime_earned: f64,
    /// Manual click count since the last prestige reset.
    pub total_clicks: u64,
    /// Base yield of one click; flat-yield upgrades bake into it at purchase.
    pub per_action_yield: f64,
    /// Owned level per item id. Absent means level 0.
    pub levels: BTreeMap<String, u32>,
    /// Completed prestige resets.
    pub prestige_count: u32,
    /// Permanent production multiplier earned through prestige.
    pub prestige_multiplier: f64,
    /// Xorshift RNG state for critical rolls; serialized so replays of a
    /// save are deterministic.
    pub rng_state: u32,
}

impl ProgressionState {
    pub fn new() -> Self {
        Self {
            balance: 0.0,
            lifetime_earned: 0.0,
            total_clicks: 0,
            per_action_yield: 1.0,
            levels: BTreeMap::new(),
            prestige_count: 0,
            prestige_multiplier: 1.0,
            rng_state: 42,
        }
    }

    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    /// Xorshift32 step. Good enough for crit rolls, and a u32 of state keeps
    /// saves small and portable.
    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Product of `magnitude^level` over owned items of one effect kind.
    fn stacked(&self, catalog: &Catalog, kind: EffectKind) -> f64 {
        catalog
            .items()
            .iter()
            .filter(|i| i.effect == kind)
            .map(|i| i.magnitude.powi(self.level(&i.id) as i32))
            .product()
    }

    /// The global production multiplier: every tier-wide effect stacked
    /// multiplicatively, times the prestige bonus. Applies to clicks and
    /// auto-generation alike.
    pub fn global_multiplier(&self, catalog: &Catalog) -> f64 {
        self.stacked(catalog, EffectKind::TierWideMultiplier) * self.prestige_multiplier
    }

    /// Click-only multiplier on top of the global one.
    pub fn click_bonus(&self, catalog: &Catalog) -> f64 {
        self.stacked(catalog, EffectKind::ClickBonus)
    }

    /// Auto-generation-only multiplier on top of the global one.
    pub fn auto_bonus(&self, catalog: &Catalog) -> f64 {
        self.stacked(catalog, EffectKind::AutoBonus)
    }

    /// Base units generated per second, before any multipliers. One unit
    /// per auto-rate level owned.
    pub fn auto_rate(&self, catalog: &Catalog) -> f64 {
        catalog
            .items()
            .iter()
            .filter(|i| i.effect == EffectKind::AutoRateUnit)
            .map(|i| self.level(&i.id) as f64)
            .sum()
    }

    /// Multiplicative discount on every purchase, in (0, 1].
    pub fn cost_reduction(&self, catalog: &Catalog) -> f64 {
        self.stacked(catalog, EffectKind::CostReduction)
    }

    /// Chance of a critical click, clamped to the ceiling.
    pub fn critical_chance(&self, catalog: &Catalog) -> f64 {
        let bonus: f64 = catalog
            .items()
            .iter()
            .filter(|i| i.effect == EffectKind::CriticalChanceBonus)
            .map(|i| i.magnitude * self.level(&i.id) as f64)
            .sum();
        (BASE_CRIT_CHANCE + bonus).min(CRIT_CHANCE_CEILING)
    }

    /// Yield multiplier on a critical click, clamped to the ceiling. The
    /// clamp makes stacking order irrelevant: any purchase order of the
    /// same upgrades lands on the same factor.
    pub fn critical_factor(&self, catalog: &Catalog) -> f64 {
        let stacked = BASE_CRIT_FACTOR * self.stacked(catalog, EffectKind::CriticalYieldBonus);
        stacked.min(CRIT_FACTOR_CEILING)
    }

    /// Current level ceiling for a cap pool: the base plus every expander
    /// level bought into that pool.
    pub fn pool_cap(&self, catalog: &Catalog, pool: CapPool) -> u32 {
        let expander_levels: u32 = catalog
            .items()
            .iter()
            .filter(|i| {
                i.effect == EffectKind::LevelCapExpander && i.tier.cap_pool() == Some(pool)
            })
            .map(|i| self.level(&i.id))
            .sum();
        TIER_BASE_CAP + CAP_STEP * expander_levels
    }

    /// Effective level cap for one item; `None` means unbounded.
    pub fn effective_cap(&self, catalog: &Catalog, id: &str) -> Option<u32> {
        let item = catalog.get(id)?;
        match item.level_cap {
            LevelCap::Fixed(n) => Some(n),
            LevelCap::Unbounded => None,
            LevelCap::Tier => item
                .tier
                .cap_pool()
                .map(|pool| self.pool_cap(catalog, pool)),
        }
    }

    /// Energy generated per second from auto-generation: each auto-rate
    /// unit produces one base yield per second, all multipliers in.
    pub fn auto_yield_per_second(&self, catalog: &Catalog) -> f64 {
        self.per_action_yield
            * self.auto_rate(catalog)
            * self.auto_bonus(catalog)
            * self.global_multiplier(catalog)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}
