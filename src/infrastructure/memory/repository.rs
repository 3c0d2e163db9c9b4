//! Generic in-memory repository
//!
//! The memory twin of the SQL repository: reads evaluate filters against
//! the shared state, writes stage closures on the context. Used by tests
//! and local development.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::context::MemContext;
use super::store::{MemEntity, MemState};
use crate::domain::auth_token::{AuthToken, AuthTokenRepository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::repository::{FieldValue, Filter, PageRequest, Repository};
use crate::domain::transact::{Transact, TransactRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

fn cmp_field(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
        (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
        (FieldValue::Decimal(a), FieldValue::Decimal(b)) => a.cmp(b),
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

pub struct MemRepository<E> {
    context: Arc<MemContext>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> MemRepository<E> {
    pub fn new(context: Arc<MemContext>) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }
}

impl<E: MemEntity> MemRepository<E> {
    async fn collect_matching(&self, filter: &Filter) -> Result<Vec<E>, DomainError> {
        filter.check_columns::<E>()?;

        let state = self.context.store().state().lock().await;
        Ok(E::map(&state)
            .values()
            .filter(|e| filter.matches(*e))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<E: MemEntity> Repository<E> for MemRepository<E> {
    async fn add(&self, entity: E) -> Result<E, DomainError> {
        let staged = entity.clone();
        self.context
            .stage(Box::new(move |state: &mut MemState| {
                E::check_insert(state, &staged)?;
                let id = E::take_next_id(state);
                let mut stored = staged.clone();
                stored.set_id(id);
                E::map_mut(state).insert(id, stored);
                Ok(1)
            }))
            .await;
        Ok(entity)
    }

    async fn add_range(&self, entities: Vec<E>) -> Result<(), DomainError> {
        for entity in entities {
            self.add(entity).await?;
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<E>, DomainError> {
        let state = self.context.store().state().lock().await;
        Ok(E::map(&state).get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<E>, DomainError> {
        let state = self.context.store().state().lock().await;
        Ok(E::map(&state).values().cloned().collect())
    }

    async fn find(&self, filter: Filter) -> Result<Vec<E>, DomainError> {
        self.collect_matching(&filter).await
    }

    async fn first_matching(&self, filter: Filter) -> Result<Option<E>, DomainError> {
        Ok(self.collect_matching(&filter).await?.into_iter().next())
    }

    async fn count(&self, filter: Option<Filter>) -> Result<u64, DomainError> {
        let matching = self.collect_matching(&filter.unwrap_or_default()).await?;
        Ok(matching.len() as u64)
    }

    async fn get_page(&self, page_number: u32, page_size: u32) -> Result<Vec<E>, DomainError> {
        self.get_page_filtered(PageRequest::new(page_number, page_size))
            .await
            .map(|(entities, _)| entities)
    }

    async fn get_page_filtered(
        &self,
        request: PageRequest,
    ) -> Result<(Vec<E>, u64), DomainError> {
        request.check()?;

        let filter = request.filter.unwrap_or_default();
        let mut matching = self.collect_matching(&filter).await?;
        let total = matching.len() as u64;

        if let Some(column) = &request.order_by {
            if !E::COLUMNS.contains(&column.as_str()) {
                return Err(DomainError::validation(format!(
                    "Unknown column '{}' for {}",
                    column,
                    E::TABLE
                )));
            }
            matching.sort_by(|a, b| {
                match (a.field(column), b.field(column)) {
                    (Some(a), Some(b)) => cmp_field(&a, &b),
                    _ => Ordering::Equal,
                }
            });
        }
        if !request.ascending {
            matching.reverse();
        }

        let offset = (request.page_number - 1) as usize * request.page_size as usize;
        let page = matching
            .into_iter()
            .skip(offset)
            .take(request.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn update(&self, entity: E) -> Result<(), DomainError> {
        let id = entity
            .id()
            .ok_or_else(|| DomainError::validation("Cannot update an unsaved entity"))?;

        self.context
            .stage(Box::new(move |state: &mut MemState| {
                match E::map_mut(state).get_mut(&id) {
                    Some(slot) => {
                        *slot = entity.clone();
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }))
            .await;
        Ok(())
    }

    async fn update_range(&self, entities: Vec<E>) -> Result<(), DomainError> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn remove(&self, entity: &E) -> Result<(), DomainError> {
        let id = entity
            .id()
            .ok_or_else(|| DomainError::validation("Cannot remove an unsaved entity"))?;

        self.context
            .stage(Box::new(move |state: &mut MemState| {
                E::before_delete(state, id)?;
                Ok(E::map_mut(state).remove(&id).map_or(0, |_| 1))
            }))
            .await;
        Ok(())
    }

    async fn remove_range(&self, entities: &[E]) -> Result<(), DomainError> {
        for entity in entities {
            self.remove(entity).await?;
        }
        Ok(())
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        self.context.save_changes().await
    }
}

impl UserRepository for MemRepository<User> {}

impl ItemRepository for MemRepository<Item> {}

impl TransactRepository for MemRepository<Transact> {}

impl AuthTokenRepository for MemRepository<AuthToken> {}
