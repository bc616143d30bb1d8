//! Core progression rules — pure functions, fully testable.
//!
//! Every operation either applies completely or returns an error leaving
//! the state untouched.

use super::catalog::Catalog;
use super::state::ProgressionState;
use crate::error::{PrestigeError, PurchaseError};

/// Energy required for the first prestige reset.
pub const PRESTIGE_BASE_THRESHOLD: f64 = 1e9;
/// Threshold multiplier per completed reset.
pub const PRESTIGE_THRESHOLD_GROWTH: f64 = 10.0;
/// Permanent production bonus gained per reset.
pub const PRESTIGE_MULTIPLIER_STEP: f64 = 0.5;

/// Result of a successful purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub cost: f64,
    pub new_level: u32,
    /// Balance left after the deduction.
    pub remaining: f64,
}

/// Result of one manual click.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub gained: f64,
    pub critical: bool,
}

/// Result of a successful prestige reset.
#[derive(Debug, Clone, PartialEq)]
pub struct PrestigeOutcome {
    pub prestige_count: u32,
    pub prestige_multiplier: f64,
}

/// Price of the next level of an item: the exponential curve, discounted,
/// floored to a whole energy amount.
pub fn current_cost(state: &ProgressionState, catalog: &Catalog, id: &str) -> Option<f64> {
    let item = catalog.get(id)?;
    let level = state.level(id);
    let raw = item.base_cost * item.cost_growth.powi(level as i32);
    Some((raw * state.cost_reduction(catalog)).floor())
}

/// Buy one level of an item. Checks run in order: existence, level cap,
/// affordability. On success the cost is deducted and any purchase-time
/// effect (flat yield) is applied immediately.
pub fn purchase(
    state: &mut ProgressionState,
    catalog: &Catalog,
    id: &str,
) -> Result<Purchase, PurchaseError> {
    let item = catalog
        .get(id)
        .ok_or_else(|| PurchaseError::UnknownItem(id.to_string()))?;

    let level = state.level(id);
    if let Some(cap) = state.effective_cap(catalog, id) {
        if level >= cap {
            return Err(PurchaseError::LevelCapReached { cap });
        }
    }

    // current_cost can't miss here, the item lookup above succeeded
    let cost = current_cost(state, catalog, id).unwrap_or(f64::INFINITY);
    if state.balance < cost {
        return Err(PurchaseError::InsufficientBalance {
            cost,
            balance: state.balance,
        });
    }

    state.balance -= cost;
    let new_level = level + 1;
    state.levels.insert(id.to_string(), new_level);

    if item.effect == super::catalog::EffectKind::FlatYieldMultiplier {
        state.per_action_yield *= item.magnitude;
    }

    log::debug!("bought {} level {} for {}", id, new_level, cost);
    Ok(Purchase {
        cost,
        new_level,
        remaining: state.balance,
    })
}

/// One manual click. Rolls for a critical, then credits
/// `per_action_yield × click bonus × global multiplier` (times the
/// critical factor on a crit) to both balance and lifetime earnings.
pub fn click(state: &mut ProgressionState, catalog: &Catalog) -> ClickOutcome {
    let chance = state.critical_chance(catalog);
    let roll = (state.next_random() % 10_000) as f64 / 10_000.0;
    let critical = roll < chance;

    let mut gained =
        state.per_action_yield * state.click_bonus(catalog) * state.global_multiplier(catalog);
    if critical {
        gained *= state.critical_factor(catalog);
    }

    state.balance += gained;
    state.lifetime_earned += gained;
    state.total_clicks += 1;
    ClickOutcome { gained, critical }
}

/// Credit auto-generation for `elapsed_seconds` of wall-clock time.
/// Returns the energy gained. Non-positive or non-finite elapsed time is
/// a no-op, so a misbehaving timer can never drain or poison the balance.
pub fn tick(state: &mut ProgressionState, catalog: &Catalog, elapsed_seconds: f64) -> f64 {
    if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
        return 0.0;
    }
    let gained = state.auto_yield_per_second(catalog) * elapsed_seconds;
    state.balance += gained;
    state.lifetime_earned += gained;
    gained
}

/// Balance required for the next prestige reset. Grows tenfold with each
/// completed reset so late resets stay meaningful.
pub fn prestige_threshold(prestige_count: u32) -> f64 {
    PRESTIGE_BASE_THRESHOLD * PRESTIGE_THRESHOLD_GROWTH.powi(prestige_count as i32)
}

/// Prestige reset: wipe the run (balance, levels, click stats, flat yield)
/// and bank a permanent +0.5 production multiplier. The RNG state survives
/// so crit sequences stay deterministic across resets.
pub fn prestige(state: &mut ProgressionState) -> Result<PrestigeOutcome, PrestigeError> {
    let required = prestige_threshold(state.prestige_count);
    if state.balance < required {
        return Err(PrestigeError::BelowThreshold {
            required,
            balance: state.balance,
        });
    }

    state.prestige_count += 1;
    state.prestige_multiplier += PRESTIGE_MULTIPLIER_STEP;
    state.balance = 0.0;
    state.lifetime_earned = 0.0;
    state.total_clicks = 0;
    state.per_action_yield = 1.0;
    state.levels.clear();

    log::info!(
        "prestige reset #{} (multiplier now x{})",
        state.prestige_count,
        state.prestige_multiplier
    );
    Ok(PrestigeOutcome {
        prestige_count: state.prestige_count,
        prestige_multiplier: state.prestige_multiplier,
    })
}
