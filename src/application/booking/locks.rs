//! Per-model admission locks
//!
//! Capacity and conflict checks are check-then-act. Holding the model's lock
//! from the first read until the write commits makes that sequence a single
//! critical section within this process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Default)]
pub struct ModelLocks {
    locks: DashMap<(Uuid, Uuid), Arc<Mutex<()>>>,
}

impl ModelLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, tenant_id: Uuid, model_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((tenant_id, model_id))
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}
