//! In-Memory Store
//!
//! Keeps all events in process memory behind a reader-writer lock. Reads
//! hand out clones, so a running query observes a stable snapshot while
//! writers proceed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::engine::{PenaltyEvent, ProofEvent, VouchEvent};
use crate::storage::{Storage, StorageError};

#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    vouches: Vec<VouchEvent>,
    proofs: HashMap<String, ProofEvent>,
    penalties: HashMap<String, Vec<PenaltyEvent>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn add_vouch(&self, vouch: VouchEvent) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        match inner
            .vouches
            .iter_mut()
            .find(|v| v.from == vouch.from && v.to == vouch.to)
        {
            Some(existing) => *existing = vouch,
            None => inner.vouches.push(vouch),
        }
        Ok(())
    }

    async fn vouches_from(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .vouches
            .iter()
            .filter(|v| v.from == user)
            .cloned()
            .collect())
    }

    async fn vouches_to(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .vouches
            .iter()
            .filter(|v| v.to == user)
            .cloned()
            .collect())
    }

    async fn set_proof(&self, proof: ProofEvent) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner.proofs.insert(proof.user.clone(), proof);
        Ok(())
    }

    async fn proof_of(&self, user: &str) -> Result<Option<ProofEvent>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.proofs.get(user).cloned())
    }

    async fn add_penalty(&self, penalty: PenaltyEvent) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner
            .penalties
            .entry(penalty.user.clone())
            .or_default()
            .push(penalty);
        Ok(())
    }

    async fn penalties_of(&self, user: &str) -> Result<Vec<PenaltyEvent>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.penalties.get(user).cloned().unwrap_or_default())
    }
}
