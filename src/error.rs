//! Shared error taxonomy.
//!
//! Expected gameplay rejections (can't afford, cap reached, below the
//! prestige threshold) are ordinary `Err` values carrying a reason; only
//! storage faults are fault-style. A rejected operation never leaves
//! partially applied state behind.

use thiserror::Error;

/// Why a purchase was rejected. No state is mutated on rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("level cap reached ({cap})")]
    LevelCapReached { cap: u32 },
    #[error("insufficient balance: need {cost}, have {balance}")]
    InsufficientBalance { cost: f64, balance: f64 },
}

/// Why a prestige reset was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrestigeError {
    #[error("balance below prestige threshold: need {required}, have {balance}")]
    BelowThreshold { required: f64, balance: f64 },
}

/// Storage-layer failures. `Unavailable` means the backing store could not
/// serve the request; previously stored rows are never corrupted by it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    #[error("username already exists: {0}")]
    AlreadyExists(String),
    #[error("malformed stored state: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Why an account operation failed.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username must be non-empty")]
    EmptyUsername,
    #[error("no free guest name after {0} attempts")]
    GuestPoolExhausted(u32),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why a score submission was rejected before reaching storage.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("score must be a finite non-negative number, got {0}")]
    InvalidScore(f64),
    #[error("category {0:?} is reserved")]
    ReservedCategory(String),
    #[error("username and display name must be non-empty")]
    EmptyName,
    #[error(transparent)]
    Store(#[from] StoreError),
}
