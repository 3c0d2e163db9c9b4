//! In-memory unit of work

use std::sync::Arc;

use async_trait::async_trait;

use super::context::MemContext;
use super::repository::MemRepository;
use super::store::MemStore;
use crate::domain::auth_token::{AuthToken, AuthTokenRepository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::transact::{Transact, TransactRepository};
use crate::domain::uow::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

pub struct MemUnitOfWork {
    context: Arc<MemContext>,
    users: MemRepository<User>,
    items: MemRepository<Item>,
    transacts: MemRepository<Transact>,
    auth_tokens: MemRepository<AuthToken>,
}

impl MemUnitOfWork {
    pub fn new(store: Arc<MemStore>) -> Self {
        let context = Arc::new(MemContext::new(store));

        Self {
            users: MemRepository::new(context.clone()),
            items: MemRepository::new(context.clone()),
            transacts: MemRepository::new(context.clone()),
            auth_tokens: MemRepository::new(context.clone()),
            context,
        }
    }
}

#[async_trait]
impl UnitOfWork for MemUnitOfWork {
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

/// Builds units of work over one shared in-memory store.
#[derive(Clone)]
pub struct MemUnitOfWorkFactory {
    store: Arc<MemStore>,
}

impl MemUnitOfWorkFactory {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<MemStore> {
        &self.store
    }
}

impl UnitOfWorkFactory for MemUnitOfWorkFactory {
    fn create(&self) -> Arc<dyn UnitOfWork> {
        Arc::new(MemUnitOfWork::new(self.store.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Item;
    use crate::domain::repository::{Entity, Filter};
    use crate::domain::transact::Transact;
    use rust_decimal_macros::dec;

    fn uow() -> MemUnitOfWork {
        MemUnitOfWork::new(MemStore::new())
    }

    #[tokio::test]
    async fn test_staged_insert_is_invisible_until_save() {
        let uow = uow();

        uow.items()
            .add(Item::new("sword", "sharp", dec!(10.0)))
            .await
            .unwrap();

        assert!(uow.items().get_all().await.unwrap().is_empty());

        uow.save_changes().await.unwrap();

        let items = uow.items().get_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), Some(1));
    }

    #[tokio::test]
    async fn test_save_is_atomic_across_repositories() {
        let uow = uow();

        uow.items()
            .add(Item::new("sword", "sharp", dec!(10.0)))
            .await
            .unwrap();
        // References a user that does not exist; the whole batch must fail.
        uow.transacts()
            .add(Transact::new(99, chrono::Utc::now(), vec![]))
            .await
            .unwrap();

        assert!(uow.save_changes().await.is_err());
        assert!(uow.items().get_all().await.unwrap().is_empty());

        // The batch stays staged; discarding clears it.
        uow.discard_changes().await;
        assert_eq!(uow.save_changes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_at_save() {
        let uow = uow();

        uow.users()
            .add(crate::domain::user::User::new("a", "a@example.com", "h1"))
            .await
            .unwrap();
        uow.save_changes().await.unwrap();

        uow.users()
            .add(crate::domain::user::User::new("b", "a@example.com", "h2"))
            .await
            .unwrap();
        assert!(uow.save_changes().await.is_err());

        let users = uow.users().find(Filter::eq("email", "a@example.com")).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_restores_state() {
        let uow = uow();

        uow.begin_transaction().await.unwrap();
        uow.items()
            .add(Item::new("sword", "sharp", dec!(10.0)))
            .await
            .unwrap();
        uow.save_changes().await.unwrap();
        assert_eq!(uow.items().get_all().await.unwrap().len(), 1);

        uow.rollback().await.unwrap();
        assert!(uow.items().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_delete_blocked_by_transaction_reference() {
        let store = MemStore::new();
        let uow = MemUnitOfWork::new(store.clone());

        uow.users()
            .add(crate::domain::user::User::new("a", "a@example.com", "h"))
            .await
            .unwrap();
        uow.items()
            .add(Item::new("sword", "sharp", dec!(10.0)))
            .await
            .unwrap();
        uow.save_changes().await.unwrap();

        uow.transacts()
            .add(Transact::new(1, chrono::Utc::now(), vec![1]))
            .await
            .unwrap();
        uow.save_changes().await.unwrap();

        let item = uow.items().get_by_id(1).await.unwrap().unwrap();
        uow.items().remove(&item).await.unwrap();
        assert!(uow.save_changes().await.is_err());
    }
}
