//! SQLite persistence layer.
//!
//! RULE: only store.rs talks to the database. The ranking service and the
//! account layer call store methods — they never execute SQL directly.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::StoreError;
use crate::persist::StateStore;

/// All schema migrations, applied in order. Statements are idempotent so
/// migrate() can run on every startup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    username     TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    password     TEXT NOT NULL,
    created_at   INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS scores (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    username     TEXT NOT NULL,
    display_name TEXT NOT NULL,
    category     TEXT NOT NULL,
    score        REAL NOT NULL,
    updated_at   INTEGER NOT NULL,
    UNIQUE (username, category)
);
CREATE INDEX IF NOT EXISTS idx_scores_order
    ON scores (score DESC, updated_at ASC);

CREATE TABLE IF NOT EXISTS idle_saves (
    username   TEXT PRIMARY KEY,
    save_json  TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS idle_rankings (
    username     TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    prestige     INTEGER NOT NULL,
    balance      REAL NOT NULL,
    updated_at   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_idle_rankings_order
    ON idle_rankings (prestige DESC, balance DESC, updated_at ASC);
";

/// A stored user account.
///
/// The password is held and compared as plaintext. Hashing it is a caller
/// concern; this layer only stores what it is handed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub created_at: i64,
}

/// One leaderboard entry, rank already assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub rank: u32,
    pub username: String,
    pub display_name: String,
    pub category: String,
    pub score: f64,
    pub updated_at: i64,
}

/// One idle-mode leaderboard entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleRankRow {
    pub rank: u32,
    pub username: String,
    pub display_name: String,
    pub prestige: u32,
    pub balance: f64,
    pub updated_at: i64,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (tests, and the no-file fallback).
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Apply the schema, then repair legacy data: older deployments wrote
    /// one score row per submission, so any duplicates collapse to the
    /// best row per (username, category).
    pub fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        let removed = self.conn.execute(
            "DELETE FROM scores WHERE EXISTS (
                 SELECT 1 FROM scores AS better
                 WHERE better.username = scores.username
                   AND better.category = scores.category
                   AND (better.score > scores.score
                        OR (better.score = scores.score AND better.id < scores.id))
             )",
            [],
        )?;
        if removed > 0 {
            log::info!("removed {removed} duplicate score rows");
        }
        Ok(())
    }

    // ── Users ──────────────────────────────────────────────────

    pub fn create_user(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
        created_at: i64,
    ) -> Result<(), StoreError> {
        let result = self.conn.execute(
            "INSERT INTO users (username, display_name, password, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![username, display_name, password, created_at],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::AlreadyExists(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_user(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, display_name, password, created_at
             FROM users WHERE username = ?1",
        )?;
        // optional(): absence is Ok(None), any other fault propagates
        Ok(stmt
            .query_row(params![username], |row| {
                Ok(UserRow {
                    username: row.get(0)?,
                    display_name: row.get(1)?,
                    password: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })
            .optional()?)
    }

    // ── Scores ─────────────────────────────────────────────────

    /// Record a score: keeps the user's best per category, in a single
    /// statement so concurrent submissions can't lose an update. The
    /// display name always refreshes to the latest submission, even when
    /// the score itself doesn't improve.
    pub fn upsert_score(
        &self,
        username: &str,
        display_name: &str,
        category: &str,
        score: f64,
        updated_at: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO scores (username, display_name, category, score, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (username, category) DO UPDATE SET
                 display_name = excluded.display_name,
                 score = CASE WHEN excluded.score > score
                              THEN excluded.score ELSE score END,
                 updated_at = CASE WHEN excluded.score > score
                              THEN excluded.updated_at ELSE updated_at END",
            params![username, display_name, category, score, updated_at],
        )?;
        Ok(())
    }

    pub fn user_score(
        &self,
        username: &str,
        category: &str,
    ) -> Result<Option<(f64, i64)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT score, updated_at FROM scores WHERE username = ?1 AND category = ?2",
        )?;
        Ok(stmt
            .query_row(params![username, category], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?)
    }

    /// Top scores, best first; ties go to the earlier submission (first to
    /// reach a score outranks later arrivals, matching the rank queries).
    /// `None` means all categories pooled together.
    pub fn leaderboard(
        &self,
        category: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ScoreRow>, StoreError> {
        let sql = match category {
            Some(_) => {
                "SELECT username, display_name, category, score, updated_at
                 FROM scores WHERE category = ?1
                 ORDER BY score DESC, updated_at ASC LIMIT ?2"
            }
            None => {
                "SELECT username, display_name, category, score, updated_at
                 FROM scores
                 ORDER BY score DESC, updated_at ASC LIMIT ?1"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(ScoreRow {
                rank: 0,
                username: row.get(0)?,
                display_name: row.get(1)?,
                category: row.get(2)?,
                score: row.get(3)?,
                updated_at: row.get(4)?,
            })
        };
        let rows = match category {
            Some(cat) => stmt.query_map(params![cat, limit], map_row)?,
            None => stmt.query_map(params![limit], map_row)?,
        };
        let mut entries = rows.collect::<Result<Vec<_>, _>>()?;
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i as u32 + 1;
        }
        Ok(entries)
    }

    /// Global rank of a user's best score across every category:
    /// 1 + the number of rows strictly ahead. A row is ahead when its
    /// score is higher, or equal but submitted earlier.
    pub fn global_rank(&self, username: &str) -> Result<Option<u32>, StoreError> {
        let mut best = self.conn.prepare(
            "SELECT score, updated_at FROM scores WHERE username = ?1
             ORDER BY score DESC, updated_at ASC LIMIT 1",
        )?;
        let target = best
            .query_row(params![username], |row| {
                Ok((row.get::<_, f64>(0)?, row.get::<_, i64>(1)?))
            })
            .optional()?;
        let (score, ts) = match target {
            Some(t) => t,
            None => return Ok(None),
        };
        let ahead: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM scores
             WHERE score > ?1 OR (score = ?1 AND updated_at < ?2)",
            params![score, ts],
            |row| row.get(0),
        )?;
        Ok(Some(ahead + 1))
    }

    /// Rank within one category, same ahead-of rule as `global_rank`.
    pub fn category_rank(
        &self,
        username: &str,
        category: &str,
    ) -> Result<Option<u32>, StoreError> {
        let (score, ts) = match self.user_score(username, category)? {
            Some(t) => t,
            None => return Ok(None),
        };
        let ahead: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM scores
             WHERE category = ?3
               AND (score > ?1 OR (score = ?1 AND updated_at < ?2))",
            params![score, ts, category],
            |row| row.get(0),
        )?;
        Ok(Some(ahead + 1))
    }

    // ── Idle saves ─────────────────────────────────────────────

    /// Store a full save, replacing whatever was there. Saves are whole
    /// snapshots, so partial merges would only corrupt them.
    pub fn save_idle_state(
        &self,
        username: &str,
        save_json: &str,
        updated_at: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO idle_saves (username, save_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (username) DO UPDATE SET
                 save_json = excluded.save_json,
                 updated_at = excluded.updated_at",
            params![username, save_json, updated_at],
        )?;
        Ok(())
    }

    pub fn load_idle_state(&self, username: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT save_json FROM idle_saves WHERE username = ?1")?;
        Ok(stmt
            .query_row(params![username], |row| row.get(0))
            .optional()?)
    }

    // ── Idle rankings ──────────────────────────────────────────

    /// Publish a player's idle standing. Last write wins: the standing
    /// mirrors the current save, not a historical best.
    pub fn upsert_idle_ranking(
        &self,
        username: &str,
        display_name: &str,
        prestige: u32,
        balance: f64,
        updated_at: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO idle_rankings (username, display_name, prestige, balance, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (username) DO UPDATE SET
                 display_name = excluded.display_name,
                 prestige = excluded.prestige,
                 balance = excluded.balance,
                 updated_at = excluded.updated_at",
            params![username, display_name, prestige, balance, updated_at],
        )?;
        Ok(())
    }

    /// Idle leaderboard: prestige first, then balance, the earlier entry
    /// winning remaining ties.
    pub fn idle_leaderboard(&self, limit: u32) -> Result<Vec<IdleRankRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, display_name, prestige, balance, updated_at
             FROM idle_rankings
             ORDER BY prestige DESC, balance DESC, updated_at ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(IdleRankRow {
                rank: 0,
                username: row.get(0)?,
                display_name: row.get(1)?,
                prestige: row.get(2)?,
                balance: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        let mut entries = rows.collect::<Result<Vec<_>, _>>()?;
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i as u32 + 1;
        }
        Ok(entries)
    }

    /// A player's published standing, rank not yet assigned.
    pub fn find_idle_ranking(&self, username: &str) -> Result<Option<IdleRankRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT username, display_name, prestige, balance, updated_at
             FROM idle_rankings WHERE username = ?1",
        )?;
        Ok(stmt
            .query_row(params![username], |row| {
                Ok(IdleRankRow {
                    rank: 0,
                    username: row.get(0)?,
                    display_name: row.get(1)?,
                    prestige: row.get(2)?,
                    balance: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })
            .optional()?)
    }

    /// A player's idle rank. A player with no published standing slots in
    /// after everyone ranked, so the UI always has a number to show.
    pub fn idle_rank(&self, username: &str) -> Result<u32, StoreError> {
        let standing = self
            .conn
            .prepare(
                "SELECT prestige, balance, updated_at FROM idle_rankings WHERE username = ?1",
            )?
            .query_row(params![username], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .optional()?;
        match standing {
            Some((prestige, balance, ts)) => {
                let ahead: u32 = self.conn.query_row(
                    "SELECT COUNT(*) FROM idle_rankings
                     WHERE prestige > ?1
                        OR (prestige = ?1 AND balance > ?2)
                        OR (prestige = ?1 AND balance = ?2 AND updated_at < ?3)",
                    params![prestige, balance, ts],
                    |row| row.get(0),
                )?;
                Ok(ahead + 1)
            }
            None => {
                let total: u32 = self.conn.query_row(
                    "SELECT COUNT(*) FROM idle_rankings",
                    [],
                    |row| row.get(0),
                )?;
                Ok(total + 1)
            }
        }
    }
}

impl StateStore for Store {
    fn load(&self, username: &str) -> Result<Option<String>, StoreError> {
        self.load_idle_state(username)
    }

    fn save(&mut self, username: &str, json: &str, now_ms: i64) -> Result<(), StoreError> {
        self.save_idle_state(username, json, now_ms)
    }
}
