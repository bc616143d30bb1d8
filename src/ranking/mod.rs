//! Score submission, leaderboards and idle-progress rankings.

pub mod store;

use crate::engine::state::ProgressionState;
use crate::engine::{save, GameSession};
use crate::error::{StoreError, SubmitError};

use store::{IdleRankRow, ScoreRow, Store};

/// Pseudo-category meaning "no filter" on leaderboard reads. Submissions
/// may not use it.
pub const CATEGORY_ALL: &str = "all";

/// Default number of leaderboard rows returned.
pub const DEFAULT_LIMIT: u32 = 10;

/// Validated front door for everything ranking-related. Wraps the store
/// so callers never see SQL-level concerns.
pub struct RankingService {
    store: Store,
}

impl RankingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Submit a run's score. Only the player's best per category is kept,
    /// but the display name refreshes on every submission. Returns the
    /// *effective* stored value and timestamp, which are the previous best
    /// when the new score did not win.
    pub fn submit_score(
        &self,
        username: &str,
        display_name: &str,
        category: &str,
        score: f64,
        timestamp: i64,
    ) -> Result<(f64, i64), SubmitError> {
        if username.trim().is_empty() || display_name.trim().is_empty() {
            return Err(SubmitError::EmptyName);
        }
        if category.eq_ignore_ascii_case(CATEGORY_ALL) {
            return Err(SubmitError::ReservedCategory(category.to_string()));
        }
        if !score.is_finite() || score < 0.0 {
            return Err(SubmitError::InvalidScore(score));
        }
        self.store
            .upsert_score(username, display_name, category, score, timestamp)?;
        log::info!("score submitted: {username} {category} {score}");
        let stored = self
            .store
            .user_score(username, category)
            .map_err(SubmitError::Store)?
            .unwrap_or((score, timestamp));
        Ok(stored)
    }

    /// Top scores for one category, or across all of them for
    /// [`CATEGORY_ALL`].
    pub fn leaderboard(&self, category: &str, limit: u32) -> Result<Vec<ScoreRow>, StoreError> {
        let filter = if category.eq_ignore_ascii_case(CATEGORY_ALL) {
            None
        } else {
            Some(category)
        };
        self.store.leaderboard(filter, limit)
    }

    pub fn global_rank(&self, username: &str) -> Result<Option<u32>, StoreError> {
        self.store.global_rank(username)
    }

    pub fn category_rank(
        &self,
        username: &str,
        category: &str,
    ) -> Result<Option<u32>, StoreError> {
        self.store.category_rank(username, category)
    }

    // ── Idle mode ──────────────────────────────────────────────

    /// Persist a session's save and publish its standing in one call, so
    /// the ranking row always mirrors the stored save.
    pub fn record_idle_progress(
        &self,
        username: &str,
        display_name: &str,
        session: &GameSession,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        let json = session.to_save_json()?;
        self.store.save_idle_state(username, &json, timestamp)?;
        self.store.upsert_idle_ranking(
            username,
            display_name,
            session.state.prestige_count,
            session.state.balance,
            timestamp,
        )
    }

    /// Load a player's stored idle state; `Ok(None)` covers both a missing
    /// save and one too old to migrate.
    pub fn load_idle_progress(
        &self,
        username: &str,
    ) -> Result<Option<ProgressionState>, StoreError> {
        match self.store.load_idle_state(username)? {
            Some(json) => Ok(save::from_json(&json)?),
            None => Ok(None),
        }
    }

    pub fn idle_leaderboard(&self, limit: u32) -> Result<Vec<IdleRankRow>, StoreError> {
        self.store.idle_leaderboard(limit)
    }

    pub fn idle_rank(&self, username: &str) -> Result<u32, StoreError> {
        self.store.idle_rank(username)
    }

    /// A player's full idle standing. With no published ranking row, a
    /// synthetic record is derived from the stored save (or zeros for a
    /// brand-new player), so callers always get something to render.
    pub fn idle_standing(&self, username: &str) -> Result<IdleRankRow, StoreError> {
        let rank = self.store.idle_rank(username)?;
        if let Some(mut row) = self.store.find_idle_ranking(username)? {
            row.rank = rank;
            return Ok(row);
        }
        let (prestige, balance) = match self.load_idle_progress(username)? {
            Some(state) => (state.prestige_count, state.balance),
            None => (0, 0.0),
        };
        Ok(IdleRankRow {
            rank,
            username: username.to_string(),
            display_name: username.to_string(),
            prestige,
            balance,
            updated_at: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RankingService {
        let store = Store::in_memory().unwrap();
        store.migrate().unwrap();
        RankingService::new(store)
    }

    #[test]
    fn submit_and_read_back() {
        let svc = service();
        svc.submit_score("alice", "Alice", "survival", 120.0, 1).unwrap();
        let board = svc.leaderboard("survival", DEFAULT_LIMIT).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].score, 120.0);
    }

    #[test]
    fn submit_rejects_bad_input() {
        let svc = service();
        assert!(matches!(
            svc.submit_score("", "Alice", "survival", 1.0, 1),
            Err(SubmitError::EmptyName)
        ));
        assert!(matches!(
            svc.submit_score("alice", "Alice", "all", 1.0, 1),
            Err(SubmitError::ReservedCategory(_))
        ));
        assert!(matches!(
            svc.submit_score("alice", "Alice", "ALL", 1.0, 1),
            Err(SubmitError::ReservedCategory(_))
        ));
        assert!(matches!(
            svc.submit_score("alice", "Alice", "survival", f64::NAN, 1),
            Err(SubmitError::InvalidScore(_))
        ));
        assert!(matches!(
            svc.submit_score("alice", "Alice", "survival", -5.0, 1),
            Err(SubmitError::InvalidScore(_))
        ));
    }

    #[test]
    fn all_category_reads_everything() {
        let svc = service();
        svc.submit_score("a", "A", "survival", 10.0, 1).unwrap();
        svc.submit_score("b", "B", "timeattack", 20.0, 2).unwrap();
        assert_eq!(svc.leaderboard("all", DEFAULT_LIMIT).unwrap().len(), 2);
        assert_eq!(svc.leaderboard("survival", DEFAULT_LIMIT).unwrap().len(), 1);
    }

    #[test]
    fn best_score_survives_worse_submissions() {
        let svc = service();
        let mut last = (0.0, 0);
        for (i, score) in [50.0, 30.0, 70.0, 60.0].into_iter().enumerate() {
            last = svc
                .submit_score("alice", "Alice", "survival", score, i as i64)
                .unwrap();
        }
        // The losing 60 came back as the stored best, stamped when the 70
        // was submitted
        assert_eq!(last, (70.0, 2));
        let board = svc.leaderboard("survival", DEFAULT_LIMIT).unwrap();
        assert_eq!(board[0].score, 70.0);
    }

    #[test]
    fn idle_standing_prefers_published_row() {
        let svc = service();
        let mut session = GameSession::new();
        session.state.prestige_count = 1;
        session.state.balance = 500.0;
        svc.record_idle_progress("alice", "Alice", &session, 7).unwrap();
        let standing = svc.idle_standing("alice").unwrap();
        assert_eq!(standing.rank, 1);
        assert_eq!(standing.display_name, "Alice");
        assert_eq!(standing.prestige, 1);
    }

    #[test]
    fn idle_standing_synthesized_from_save_alone() {
        let svc = service();
        // A save exists but no ranking row was ever published
        let mut session = GameSession::new();
        session.state.prestige_count = 4;
        session.state.balance = 9_000.0;
        svc.store()
            .save_idle_state("bob", &session.to_save_json().unwrap(), 3)
            .unwrap();
        let standing = svc.idle_standing("bob").unwrap();
        assert_eq!(standing.prestige, 4);
        assert_eq!(standing.balance, 9_000.0);
        assert_eq!(standing.rank, 1); // nobody is ranked, so first open slot
    }

    #[test]
    fn idle_standing_for_unknown_player_is_zeroed() {
        let svc = service();
        let standing = svc.idle_standing("ghost").unwrap();
        assert_eq!(standing.prestige, 0);
        assert_eq!(standing.balance, 0.0);
        assert_eq!(standing.rank, 1);
    }

    #[test]
    fn idle_progress_roundtrip() {
        let svc = service();
        let mut session = GameSession::new();
        session.state.balance = 4_000.0;
        session.state.prestige_count = 2;
        session.state.levels.insert("earth".into(), 3);
        svc.record_idle_progress("alice", "Alice", &session, 10).unwrap();

        let restored = svc.load_idle_progress("alice").unwrap().unwrap();
        assert_eq!(restored.balance, 4_000.0);
        assert_eq!(restored.level("earth"), 3);

        let board = svc.idle_leaderboard(DEFAULT_LIMIT).unwrap();
        assert_eq!(board[0].prestige, 2);
        assert_eq!(board[0].balance, 4_000.0);
    }

    #[test]
    fn load_idle_progress_missing_user() {
        let svc = service();
        assert!(svc.load_idle_progress("ghost").unwrap().is_none());
    }

    #[test]
    fn idle_rank_matches_leaderboard_position() {
        let svc = service();
        let mut a = GameSession::new();
        a.state.prestige_count = 3;
        let mut b = GameSession::new();
        b.state.balance = 1e12;
        svc.record_idle_progress("a", "A", &a, 1).unwrap();
        svc.record_idle_progress("b", "B", &b, 2).unwrap();
        assert_eq!(svc.idle_rank("a").unwrap(), 1);
        assert_eq!(svc.idle_rank("b").unwrap(), 2);
        assert_eq!(svc.idle_rank("ghost").unwrap(), 3);
    }
}
