//! Event Types
//!
//! Immutable value records the engine computes over. Events are owned by the
//! store; the engine only ever sees snapshot copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directed endorsement of one user by another.
///
/// At most one vouch exists per ordered `(from, to)` pair; a later vouch
/// replaces the earlier record. The signature/nonce pair is carried as
/// opaque data and never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchEvent {
    /// User issuing the endorsement
    pub from: String,

    /// User being endorsed
    pub to: String,

    /// Opaque signature supplied by the caller (not verified)
    pub signature: String,

    /// Opaque nonce supplied by the caller (not verified)
    pub nonce: String,

    /// When the vouch was recorded
    pub timestamp: DateTime<Utc>,
}

/// A moderator-asserted baseline balance for a user.
///
/// One proof record per user; a new proof replaces the prior one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEvent {
    pub user: String,

    /// Asserted balance, non-negative
    pub balance: u64,

    /// When the proof was recorded
    pub timestamp: DateTime<Utc>,
}

/// A moderator-issued penalty against a user.
///
/// Penalties accumulate; they are never replaced or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyEvent {
    pub user: String,

    /// Penalty amount, non-negative
    pub amount: u64,

    /// When the penalty was recorded
    pub timestamp: DateTime<Utc>,
}

/// Result of an identity query: the user's aggregated balance and penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdtInfo {
    pub user: String,

    /// Effective balance; negative when penalties exceed proof
    pub balance: i64,

    /// Effective penalty, including inherited shares
    pub penalty: u64,
}
