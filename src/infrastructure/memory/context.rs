//! Staged-write context over the in-memory store
//!
//! Same contract as the SQL context: writes are staged, `save_changes`
//! applies the batch atomically (the state is snapshotted and restored on
//! failure, and the failed batch stays staged), and an explicit transaction
//! snapshots the state until commit or rollback.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::store::{MemState, MemStore};
use crate::domain::DomainError;

pub type MemWrite = Box<dyn Fn(&mut MemState) -> Result<u64, DomainError> + Send + Sync>;

pub struct MemContext {
    store: Arc<MemStore>,
    staged: Mutex<Vec<MemWrite>>,
    tx_snapshot: Mutex<Option<MemState>>,
}

impl MemContext {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self {
            store,
            staged: Mutex::new(Vec::new()),
            tx_snapshot: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &MemStore {
        &self.store
    }

    pub async fn stage(&self, write: MemWrite) {
        self.staged.lock().await.push(write);
    }

    pub async fn discard(&self) {
        self.staged.lock().await.clear();
    }

    pub async fn save_changes(&self) -> Result<u64, DomainError> {
        let mut staged = self.staged.lock().await;
        if staged.is_empty() {
            return Ok(0);
        }

        let mut state = self.store.state().lock().await;
        let snapshot = state.clone();

        let mut affected = 0;
        for write in staged.iter() {
            match write(&mut *state) {
                Ok(rows) => affected += rows,
                Err(err) => {
                    *state = snapshot;
                    return Err(err);
                }
            }
        }

        staged.clear();
        Ok(affected)
    }

    pub async fn begin_transaction(&self) -> Result<(), DomainError> {
        let mut tx_snapshot = self.tx_snapshot.lock().await;
        if tx_snapshot.is_some() {
            return Err(DomainError::storage("A transaction is already open"));
        }

        *tx_snapshot = Some(self.store.state().lock().await.clone());
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), DomainError> {
        self.tx_snapshot
            .lock()
            .await
            .take()
            .ok_or_else(|| DomainError::storage("No open transaction to commit"))?;
        Ok(())
    }

    pub async fn rollback(&self) -> Result<(), DomainError> {
        let snapshot = self
            .tx_snapshot
            .lock()
            .await
            .take()
            .ok_or_else(|| DomainError::storage("No open transaction to roll back"))?;

        *self.store.state().lock().await = snapshot;
        Ok(())
    }
}
