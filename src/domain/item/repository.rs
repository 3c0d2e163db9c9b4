//! Item repository trait

use async_trait::async_trait;

use super::entity::Item;
use crate::domain::repository::{Filter, Repository};
use crate::domain::DomainError;

/// Item-specific lookups on top of the generic repository contract.
#[async_trait]
pub trait ItemRepository: Repository<Item> {
    /// Look up an item by name.
    async fn get_by_name(&self, name: &str) -> Result<Option<Item>, DomainError> {
        self.first_matching(Filter::eq("name", name)).await
    }
}
