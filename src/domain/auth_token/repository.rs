//! Auth token repository trait

use async_trait::async_trait;

use super::entity::AuthToken;
use crate::domain::repository::{Filter, Repository};
use crate::domain::DomainError;

/// Token-record operations on top of the generic contract.
#[async_trait]
pub trait AuthTokenRepository: Repository<AuthToken> {
    /// Stage a freshly issued token record for a user.
    async fn create_for_user(&self, user_id: i32) -> Result<AuthToken, DomainError> {
        self.add(AuthToken::issue(user_id)).await
    }

    /// All token records emitted for one user.
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<AuthToken>, DomainError> {
        self.find(Filter::eq("user_id", user_id)).await
    }
}
