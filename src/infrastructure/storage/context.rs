//! Shared write context for a PostgreSQL-backed unit of work
//!
//! Repositories stage write commands here; `save_changes` applies the whole
//! batch inside one transaction. A failed batch stays staged so the caller
//! can discard or retry it. An explicit transaction can be opened to span
//! several `save_changes` calls.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{PgConnection, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// A single write command staged against the change set.
#[async_trait]
pub trait StagedWrite: Send + Sync {
    /// Execute the command on the given connection. Returns affected rows.
    async fn apply(&self, conn: &mut PgConnection) -> Result<u64, DomainError>;
}

pub struct PgContext {
    pool: PgPool,
    staged: Mutex<Vec<Box<dyn StagedWrite>>>,
    open_tx: Mutex<Option<Transaction<'static, Postgres>>>,
}

impl PgContext {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
            open_tx: Mutex::new(None),
        }
    }

    /// Reads always go through the pool, not an open explicit transaction;
    /// staged writes are invisible to reads until saved.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn stage(&self, write: Box<dyn StagedWrite>) {
        self.staged.lock().await.push(write);
    }

    pub async fn staged_count(&self) -> usize {
        self.staged.lock().await.len()
    }

    pub async fn discard(&self) {
        self.staged.lock().await.clear();
    }

    /// Apply every staged write. With no explicit transaction open, the
    /// batch runs in its own transaction. With one open, the writes land in
    /// it and become durable at `commit`.
    ///
    /// On failure the batch stays staged; inside an explicit transaction
    /// the caller is expected to roll back.
    pub async fn save_changes(&self) -> Result<u64, DomainError> {
        let mut staged = self.staged.lock().await;
        if staged.is_empty() {
            return Ok(0);
        }

        let mut open_tx = self.open_tx.lock().await;
        let affected = match open_tx.as_mut() {
            Some(tx) => {
                let mut affected = 0;
                for write in staged.iter() {
                    affected += write.apply(&mut **tx).await?;
                }
                affected
            }
            None => {
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

                let mut affected = 0;
                for write in staged.iter() {
                    affected += write.apply(&mut *tx).await?;
                }

                tx.commit()
                    .await
                    .map_err(|e| DomainError::storage(format!("Failed to commit: {}", e)))?;
                affected
            }
        };

        staged.clear();
        Ok(affected)
    }

    pub async fn begin_transaction(&self) -> Result<(), DomainError> {
        let mut open_tx = self.open_tx.lock().await;
        if open_tx.is_some() {
            return Err(DomainError::storage("A transaction is already open"));
        }

        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;
        *open_tx = Some(tx);
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), DomainError> {
        let tx = self
            .open_tx
            .lock()
            .await
            .take()
            .ok_or_else(|| DomainError::storage("No open transaction to commit"))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit: {}", e)))
    }

    pub async fn rollback(&self) -> Result<(), DomainError> {
        let tx = self
            .open_tx
            .lock()
            .await
            .take()
            .ok_or_else(|| DomainError::storage("No open transaction to roll back"))?;

        tx.rollback()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to roll back: {}", e)))
    }
}

/// Map a database error to the domain taxonomy. Constraint violations are
/// conflicts, everything else is a storage failure.
pub fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return DomainError::conflict(format!(
                    "Unique constraint violated: {}",
                    db_err.message()
                ))
            }
            Some("23503") => {
                return DomainError::conflict(format!(
                    "Referential constraint violated: {}",
                    db_err.message()
                ))
            }
            _ => {}
        }
    }

    DomainError::storage(format!("Database error: {}", err))
}
