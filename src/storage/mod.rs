//! Event Store Backends
//!
//! Defines the read/write surface the engine consumes and the two backends
//! that satisfy it: an in-memory store and a SQLite-backed store. Both must
//! yield identical query results on equal inputs.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use thiserror::Error;

use crate::engine::{PenaltyEvent, ProofEvent, VouchEvent};

/// Errors raised by a storage backend. These never reach clients: the
/// service logs them and treats the affected read as empty data.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid stored record: {0}")]
    Corrupt(String),
}

/// Read/write surface over the event history.
///
/// Reads return owned snapshots that stay stable for the duration of one
/// query. Return order is unspecified; callers must not depend on it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Records a vouch, replacing any prior vouch for the same ordered
    /// `(from, to)` pair.
    async fn add_vouch(&self, vouch: VouchEvent) -> Result<(), StorageError>;

    /// All vouches issued by `user`.
    async fn vouches_from(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError>;

    /// All vouches received by `user`.
    async fn vouches_to(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError>;

    /// Stores the proof for a user, replacing any prior record.
    async fn set_proof(&self, proof: ProofEvent) -> Result<(), StorageError>;

    /// The stored proof for `user`, if any.
    async fn proof_of(&self, user: &str) -> Result<Option<ProofEvent>, StorageError>;

    /// Appends a penalty event; penalties are never replaced or deleted.
    async fn add_penalty(&self, penalty: PenaltyEvent) -> Result<(), StorageError>;

    /// All penalties recorded against `user`.
    async fn penalties_of(&self, user: &str) -> Result<Vec<PenaltyEvent>, StorageError>;
}
