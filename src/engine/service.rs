//! Identity Service Orchestrator
//!
//! Owns the storage handle and the evaluation clock, and exposes the write
//! surface plus the top-level identity query. Storage failures never escape
//! a query: reads degrade to empty data and writes are logged and dropped,
//! so aggregation stays total.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::engine::{IdtInfo, PenaltyEvent, ProofEvent, VouchEvent};
use crate::storage::Storage;

/// Source of the current evaluation time. Tests install a constant function.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Application-level entry point for recording events and answering
/// identity queries.
pub struct IdentityService {
    storage: Arc<dyn Storage>,
    clock: Clock,
}

impl IdentityService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replaces the wall clock, for deterministic evaluation times.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current evaluation time as seen by the engine.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Records a vouch from `from` to `to`, replacing any prior vouch for
    /// the same ordered pair. The signature/nonce pair is stored untouched
    /// and never interpreted.
    pub async fn record_vouch(&self, from: &str, signature: &str, nonce: &str, to: &str) {
        let vouch = VouchEvent {
            from: from.to_string(),
            to: to.to_string(),
            signature: signature.to_string(),
            nonce: nonce.to_string(),
            timestamp: self.now(),
        };
        if let Err(e) = self.storage.add_vouch(vouch).await {
            warn!(error = %e, from = %from, to = %to, "Failed to store vouch");
        }
    }

    /// Records the moderator-asserted balance for `user`, replacing any
    /// prior proof.
    pub async fn record_proof(&self, user: &str, balance: u64) {
        let proof = ProofEvent {
            user: user.to_string(),
            balance,
            timestamp: self.now(),
        };
        if let Err(e) = self.storage.set_proof(proof).await {
            warn!(error = %e, user = %user, "Failed to store proof");
        }
    }

    /// Records a penalty against `user`. Penalties accumulate.
    pub async fn record_penalty(&self, user: &str, amount: u64) {
        let penalty = PenaltyEvent {
            user: user.to_string(),
            amount,
            timestamp: self.now(),
        };
        if let Err(e) = self.storage.add_penalty(penalty).await {
            warn!(error = %e, user = %user, "Failed to store penalty");
        }
    }

    /// Answers the identity query: balance and penalty are computed
    /// independently, each over its own tree.
    pub async fn identity(&self, user: &str, eval_time: Option<DateTime<Utc>>) -> IdtInfo {
        let eval = eval_time.unwrap_or_else(|| self.now());
        IdtInfo {
            user: user.to_string(),
            balance: self.balance(user, None, Some(eval)).await,
            penalty: self.penalty(user, None, Some(eval)).await,
        }
    }

    // Snapshot reads. A failing store behaves like an empty one.

    pub(crate) async fn vouches_from(&self, user: &str) -> Vec<VouchEvent> {
        match self.storage.vouches_from(user).await {
            Ok(vouches) => vouches,
            Err(e) => {
                warn!(error = %e, user = %user, "Failed to read outgoing vouches");
                Vec::new()
            }
        }
    }

    pub(crate) async fn vouches_to(&self, user: &str) -> Vec<VouchEvent> {
        match self.storage.vouches_to(user).await {
            Ok(vouches) => vouches,
            Err(e) => {
                warn!(error = %e, user = %user, "Failed to read incoming vouches");
                Vec::new()
            }
        }
    }

    pub(crate) async fn proof_of(&self, user: &str) -> Option<ProofEvent> {
        match self.storage.proof_of(user).await {
            Ok(proof) => proof,
            Err(e) => {
                warn!(error = %e, user = %user, "Failed to read proof record");
                None
            }
        }
    }

    pub(crate) async fn penalties_of(&self, user: &str) -> Vec<PenaltyEvent> {
        match self.storage.penalties_of(user).await {
            Ok(penalties) => penalties,
            Err(e) => {
                warn!(error = %e, user = %user, "Failed to read penalties");
                Vec::new()
            }
        }
    }
}
