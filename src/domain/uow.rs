//! Unit of work contract
//!
//! A unit of work groups repository access over a shared change set: writes
//! are staged on the repositories and applied together by `save_changes`,
//! all inside a single storage transaction. An explicit transaction can be
//! opened to span several `save_changes` calls.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth_token::AuthTokenRepository;
use crate::domain::item::ItemRepository;
use crate::domain::transact::TransactRepository;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn items(&self) -> &dyn ItemRepository;

    fn transacts(&self) -> &dyn TransactRepository;

    fn auth_tokens(&self) -> &dyn AuthTokenRepository;

    /// Apply every staged write atomically. Returns the number of affected
    /// rows. On failure the staged writes are kept, so the caller may
    /// discard or retry them.
    async fn save_changes(&self) -> Result<u64, DomainError>;

    /// Drop all staged writes without applying them.
    async fn discard_changes(&self);

    /// Open an explicit transaction spanning subsequent `save_changes`
    /// calls until commit or rollback.
    async fn begin_transaction(&self) -> Result<(), DomainError>;

    async fn commit(&self) -> Result<(), DomainError>;

    async fn rollback(&self) -> Result<(), DomainError>;
}

/// Builds a fresh unit of work, one per request.
pub trait UnitOfWorkFactory: Send + Sync {
    fn create(&self) -> Arc<dyn UnitOfWork>;
}
