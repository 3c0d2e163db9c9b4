//! User repository trait

use async_trait::async_trait;

use super::entity::User;
use crate::domain::repository::{Filter, Repository};
use crate::domain::DomainError;

/// User-specific lookups on top of the generic repository contract.
///
/// Absence is always signalled with `None`/`false`, never an error.
#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Look up a user by email (used by login and the duplicate check).
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.first_matching(Filter::eq("email", email)).await
    }

    /// Look up a user by username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.first_matching(Filter::eq("username", username)).await
    }

    /// Whether an email is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        self.exists(Filter::eq("email", email)).await
    }

    /// Stage the deletion of a user by id; `false` when absent.
    async fn delete_by_id(&self, id: i32) -> Result<bool, DomainError> {
        match self.get_by_id(id).await? {
            Some(user) => {
                self.remove(&user).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
