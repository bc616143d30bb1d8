//! Debounced save persistence.
//!
//! Saves are expensive relative to how often state changes (every click
//! dirties it), so writes are debounced: each change arms a deadline one
//! quiet period ahead, and the flush happens only once input pauses. All
//! timing flows through caller-supplied timestamps, never the wall clock,
//! so the schedule is fully testable.

use std::collections::BTreeMap;

use crate::engine::GameSession;
use crate::error::StoreError;

/// Quiet period after the last change before a flush fires.
pub const FLUSH_QUIET_MS: f64 = 1_000.0;

/// Anything that can hold one serialized save per user. Writes carry the
/// caller's timestamp; no implementation reads the wall clock.
pub trait StateStore {
    fn load(&self, username: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, username: &str, json: &str, now_ms: i64) -> Result<(), StoreError>;
}

/// In-memory store: the no-database fallback, and the test double.
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, username: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(username).cloned())
    }

    fn save(&mut self, username: &str, json: &str, _now_ms: i64) -> Result<(), StoreError> {
        self.entries.insert(username.to_string(), json.to_string());
        Ok(())
    }
}

/// Binds one session to a store and schedules its flushes.
pub struct PersistenceAdapter<S: StateStore> {
    store: S,
    username: String,
    /// Timestamp (ms) at which the pending flush fires; None when clean.
    flush_deadline: Option<f64>,
}

impl<S: StateStore> PersistenceAdapter<S> {
    pub fn new(store: S, username: impl Into<String>) -> Self {
        Self {
            store,
            username: username.into(),
            flush_deadline: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored save into the session, if one exists and is still
    /// compatible. Returns whether state was restored.
    pub fn hydrate(&self, session: &mut GameSession) -> Result<bool, StoreError> {
        match self.store.load(&self.username)? {
            Some(json) => Ok(session.load_save_json(&json)?),
            None => Ok(false),
        }
    }

    /// Note a state change at `now_ms`. Re-arms the deadline, so a burst
    /// of changes collapses into one write after the burst ends.
    pub fn mark_dirty(&mut self, now_ms: f64) {
        self.flush_deadline = Some(now_ms + FLUSH_QUIET_MS);
    }

    pub fn is_dirty(&self) -> bool {
        self.flush_deadline.is_some()
    }

    /// Flush if the quiet period has elapsed. Returns whether a write
    /// happened. On a store failure the deadline stays armed, so the next
    /// poll retries.
    pub fn poll(&mut self, session: &GameSession, now_ms: f64) -> Result<bool, StoreError> {
        match self.flush_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.write(session, now_ms)?;
                self.flush_deadline = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Unconditional flush, for session teardown. Clears any pending
    /// deadline.
    pub fn flush(&mut self, session: &GameSession, now_ms: f64) -> Result<(), StoreError> {
        self.write(session, now_ms)?;
        self.flush_deadline = None;
        Ok(())
    }

    fn write(&mut self, session: &GameSession, now_ms: f64) -> Result<(), StoreError> {
        let json = session.to_save_json()?;
        self.store.save(&self.username, &json, now_ms as i64)?;
        log::debug!("flushed save for {}", self.username);
        Ok(())
    }
}
