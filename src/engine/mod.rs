//! Incremental progression engine: catalog, state, rules and saves.

pub mod catalog;
pub mod logic;
pub mod save;
mod simulator;
pub mod state;

use catalog::Catalog;
use state::ProgressionState;

use crate::clock::SessionClock;
use crate::error::{PrestigeError, PurchaseError};

/// One player's live session: a catalog, the progression state and the
/// wall clock driving auto-generation.
pub struct GameSession {
    catalog: Catalog,
    pub state: ProgressionState,
    clock: SessionClock,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_catalog(Catalog::standard())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: ProgressionState::new(),
            clock: SessionClock::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn click(&mut self) -> logic::ClickOutcome {
        logic::click(&mut self.state, &self.catalog)
    }

    pub fn purchase(&mut self, id: &str) -> Result<logic::Purchase, PurchaseError> {
        logic::purchase(&mut self.state, &self.catalog, id)
    }

    /// Feed a wall-clock timestamp (ms) and credit auto-generation for the
    /// time elapsed since the previous call. Returns the energy gained.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let elapsed = self.clock.update(now_ms);
        logic::tick(&mut self.state, &self.catalog, elapsed)
    }

    pub fn prestige(&mut self) -> Result<logic::PrestigeOutcome, PrestigeError> {
        logic::prestige(&mut self.state)
    }

    pub fn current_cost(&self, id: &str) -> Option<f64> {
        logic::current_cost(&self.state, &self.catalog, id)
    }

    pub fn to_save_json(&self) -> serde_json::Result<String> {
        save::to_json(&self.state)
    }

    /// Restore state from a save. Returns false when the save is too old
    /// to load, leaving the current state untouched.
    pub fn load_save_json(&mut self, json: &str) -> serde_json::Result<bool> {
        match save::from_json(json)? {
            Some(state) => {
                self.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
