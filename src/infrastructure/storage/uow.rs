//! PostgreSQL-backed unit of work

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use super::context::PgContext;
use super::sql_repository::SqlRepository;
use super::transact_repository::PgTransactRepository;
use crate::domain::auth_token::{AuthToken, AuthTokenRepository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::transact::TransactRepository;
use crate::domain::uow::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// One unit of work per request: four repositories over one shared change
/// set and connection pool.
pub struct PgUnitOfWork {
    context: Arc<PgContext>,
    users: SqlRepository<User>,
    items: SqlRepository<Item>,
    transacts: PgTransactRepository,
    auth_tokens: SqlRepository<AuthToken>,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        let context = Arc::new(PgContext::new(pool));

        Self {
            users: SqlRepository::new(context.clone()),
            items: SqlRepository::new(context.clone()),
            transacts: PgTransactRepository::new(context.clone()),
            auth_tokens: SqlRepository::new(context.clone()),
            context,
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn items(&self) -> &dyn ItemRepository {
        &self.items
    }

    fn transacts(&self) -> &dyn TransactRepository {
        &self.transacts
    }

    fn auth_tokens(&self) -> &dyn AuthTokenRepository {
        &self.auth_tokens
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        self.context.save_changes().await
    }

    async fn discard_changes(&self) {
        self.context.discard().await;
    }

    async fn begin_transaction(&self) -> Result<(), DomainError> {
        self.context.begin_transaction().await
    }

    async fn commit(&self) -> Result<(), DomainError> {
        self.context.commit().await
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        self.context.rollback().await
    }
}

/// Builds a fresh [`PgUnitOfWork`] per request off a shared pool.
#[derive(Clone)]
pub struct PgUnitOfWorkFactory {
    pool: PgPool,
}

impl PgUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    fn create(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(PgUnitOfWork::new(self.pool.clone()))
    }
}
