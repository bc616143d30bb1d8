//! universe-clicker — an incremental progression engine with persistent
//! scores and rankings.
//!
//! The crate splits into four layers:
//!
//! - [`engine`]: the pure game rules — catalog, state, purchases, clicks,
//!   auto-generation and prestige. No I/O.
//! - [`persist`]: debounced save persistence over a pluggable store.
//! - [`ranking`]: score submission, leaderboards and idle-progress
//!   rankings, backed by SQLite.
//! - [`account`]: registration, login and guest identities.

pub mod account;
pub mod clock;
pub mod engine;
pub mod error;
pub mod format;
pub mod persist;
pub mod ranking;

pub use engine::GameSession;
