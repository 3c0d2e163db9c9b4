//! Transaction repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entity::Transact;
use crate::domain::repository::{Filter, Repository};
use crate::domain::DomainError;

/// Transaction-specific operations on top of the generic contract.
#[async_trait]
pub trait TransactRepository: Repository<Transact> {
    /// Stage a new transaction together with its item references.
    async fn create(&self, transact: Transact) -> Result<Transact, DomainError> {
        self.add(transact).await
    }

    /// All transactions belonging to one user.
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<Transact>, DomainError> {
        self.find(Filter::eq("user_id", user_id)).await
    }

    /// Stage the deletion of the transaction recorded at the exact
    /// date/time; `false` when none matches.
    async fn delete_by_date(&self, date: DateTime<Utc>) -> Result<bool, DomainError> {
        match self
            .first_matching(Filter::eq("transaction_date", date))
            .await?
        {
            Some(transact) => {
                self.remove(&transact).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
