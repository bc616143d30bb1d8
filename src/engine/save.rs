//! Versioned save format for progression state.
//!
//! Versioning policy:
//!
//! - `SAVE_VERSION`: current format version. Bump on any field addition.
//! - `MIN_COMPATIBLE_VERSION`: oldest version still loadable. Field
//!   additions alone keep it unchanged (missing fields fill with
//!   defaults); bump it only on breaking changes to existing fields.
//!
//! Levels are stored by item id, so a save written against an older
//! catalog loads cleanly: ids that no longer exist simply stop
//! contributing to any derived quantity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::ProgressionState;

/// Current save format version.
pub const SAVE_VERSION: u32 = 2;

/// Oldest loadable save version.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct GameSave {
    balance: f64,
    lifetime_earned: f64,
    total_clicks: u64,
    per_action_yield: f64,
    /// Owned level per item id.
    levels: BTreeMap<String, u32>,
    prestige_count: u32,
    prestige_multiplier: f64,
    rng_state: u32,
}

impl Default for GameSave {
    fn default() -> Self {
        let fresh = ProgressionState::new();
        Self {
            balance: fresh.balance,
            lifetime_earned: fresh.lifetime_earned,
            total_clicks: fresh.total_clicks,
            per_action_yield: fresh.per_action_yield,
            levels: BTreeMap::new(),
            prestige_count: fresh.prestige_count,
            prestige_multiplier: fresh.prestige_multiplier,
            rng_state: fresh.rng_state,
        }
    }
}

fn extract_save(state: &ProgressionState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            balance: state.balance,
            lifetime_earned: state.lifetime_earned,
            total_clicks: state.total_clicks,
            per_action_yield: state.per_action_yield,
            levels: state.levels.clone(),
            prestige_count: state.prestige_count,
            prestige_multiplier: state.prestige_multiplier,
            rng_state: state.rng_state,
        },
    }
}

fn apply_save(save: GameSave) -> ProgressionState {
    ProgressionState {
        balance: save.balance,
        lifetime_earned: save.lifetime_earned,
        total_clicks: save.total_clicks,
        per_action_yield: save.per_action_yield,
        levels: save.levels,
        prestige_count: save.prestige_count,
        prestige_multiplier: save.prestige_multiplier,
        rng_state: save.rng_state,
    }
}

/// Serialize a state to its JSON save form.
pub fn to_json(state: &ProgressionState) -> serde_json::Result<String> {
    serde_json::to_string(&extract_save(state))
}

/// Parse a JSON save. `Ok(None)` means the save predates
/// `MIN_COMPATIBLE_VERSION` and the caller should start fresh.
pub fn from_json(json: &str) -> serde_json::Result<Option<ProgressionState>> {
    let save: SaveData = serde_json::from_str(json)?;
    if save.version < MIN_COMPATIBLE_VERSION {
        log::warn!(
            "discarding incompatible save (saved={}, min_compatible={})",
            save.version,
            MIN_COMPATIBLE_VERSION
        );
        return Ok(None);
    }
    if save.version < SAVE_VERSION {
        log::info!(
            "migrating save from version {} to {}",
            save.version,
            SAVE_VERSION
        );
    }
    Ok(Some(apply_save(save.game)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_everything() {
        let mut state = ProgressionState::new();
        state.balance = 12_345.6;
        state.lifetime_earned = 99_999.0;
        state.total_clicks = 42;
        state.per_action_yield = 1.2f64.powi(3);
        state.levels.insert("mercury".into(), 3);
        state.levels.insert("orion".into(), 1);
        state.prestige_count = 2;
        state.prestige_multiplier = 2.0;
        state.rng_state = 12_345;

        let json = to_json(&state).unwrap();
        let restored = from_json(&json).unwrap().unwrap();

        assert!((restored.balance - 12_345.6).abs() < 1e-9);
        assert!((restored.lifetime_earned - 99_999.0).abs() < 1e-9);
        assert_eq!(restored.total_clicks, 42);
        assert!((restored.per_action_yield - state.per_action_yield).abs() < 1e-12);
        assert_eq!(restored.level("mercury"), 3);
        assert_eq!(restored.level("orion"), 1);
        assert_eq!(restored.prestige_count, 2);
        assert!((restored.prestige_multiplier - 2.0).abs() < 1e-9);
        assert_eq!(restored.rng_state, 12_345);
    }

    #[test]
    fn old_version_fills_missing_fields_with_defaults() {
        // A v1 save from before the prestige fields existed
        let old_json = r#"{
            "version": 1,
            "game": {
                "balance": 5000.0,
                "lifetime_earned": 10000.0,
                "total_clicks": 200,
                "levels": {"earth": 2}
            }
        }"#;
        let restored = from_json(old_json).unwrap().unwrap();
        assert!((restored.balance - 5_000.0).abs() < 1e-9);
        assert_eq!(restored.total_clicks, 200);
        assert_eq!(restored.level("earth"), 2);
        // Missing fields come back as fresh-state values
        assert_eq!(restored.per_action_yield, 1.0);
        assert_eq!(restored.prestige_count, 0);
        assert_eq!(restored.prestige_multiplier, 1.0);
    }

    #[test]
    fn version_below_min_compatible_is_discarded() {
        let json = r#"{"version": 0, "game": {}}"#;
        assert!(from_json(json).unwrap().is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "version": 2,
            "game": {
                "balance": 100.0,
                "future_unknown_field": "ignored"
            }
        }"#;
        let restored = from_json(json).unwrap().unwrap();
        assert!((restored.balance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn stale_item_ids_survive_the_roundtrip() {
        let mut state = ProgressionState::new();
        state.levels.insert("retired_item".into(), 4);
        let restored = from_json(&to_json(&state).unwrap()).unwrap().unwrap();
        // Kept in the map; derived quantities just never see it
        assert_eq!(restored.level("retired_item"), 4);
    }

    #[test]
    fn corrupt_json_is_an_error() {
        assert!(from_json("{not json").is_err());
        assert!(from_json(r#"{"version": "two", "game": {}}"#).is_err());
    }
}
