//! In-memory state shared by the memory-backed repositories
//!
//! Mirrors the SQL schema closely enough for the service layer to be
//! exercised without a database: per-table maps, sequence counters, the
//! unique email index and the referential rules, enforced when staged
//! writes are applied.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::auth_token::AuthToken;
use crate::domain::item::Item;
use crate::domain::repository::Entity;
use crate::domain::transact::Transact;
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;

#[derive(Debug, Clone, Default)]
pub struct MemState {
    pub users: BTreeMap<i32, User>,
    pub items: BTreeMap<i32, Item>,
    pub transacts: BTreeMap<i32, Transact>,
    pub auth_tokens: BTreeMap<i32, AuthToken>,
    next_user_id: i32,
    next_item_id: i32,
    next_transact_id: i32,
    next_auth_token_id: i32,
}

/// Storage hooks for one entity type in the in-memory state.
pub trait MemEntity: Entity {
    fn map(state: &MemState) -> &BTreeMap<i32, Self>;

    fn map_mut(state: &mut MemState) -> &mut BTreeMap<i32, Self>;

    fn take_next_id(state: &mut MemState) -> i32;

    fn set_id(&mut self, id: i32);

    /// Constraint checks run right before an insert is applied.
    fn check_insert(state: &MemState, entity: &Self) -> Result<(), DomainError> {
        let _ = (state, entity);
        Ok(())
    }

    /// Cascades and restrictions run right before a delete is applied.
    fn before_delete(state: &mut MemState, id: i32) -> Result<(), DomainError> {
        let _ = (state, id);
        Ok(())
    }
}

impl MemEntity for User {
    fn map(state: &MemState) -> &BTreeMap<i32, Self> {
        &state.users
    }

    fn map_mut(state: &mut MemState) -> &mut BTreeMap<i32, Self> {
        &mut state.users
    }

    fn take_next_id(state: &mut MemState) -> i32 {
        state.next_user_id += 1;
        state.next_user_id
    }

    fn set_id(&mut self, id: i32) {
        self.assign_id(id);
    }

    fn check_insert(state: &MemState, entity: &Self) -> Result<(), DomainError> {
        if state.users.values().any(|u| u.email() == entity.email()) {
            return Err(DomainError::conflict(format!(
                "Unique constraint violated: email '{}' already exists",
                entity.email()
            )));
        }
        Ok(())
    }

    fn before_delete(state: &mut MemState, id: i32) -> Result<(), DomainError> {
        state.auth_tokens.retain(|_, t| t.user_id() != id);
        state.transacts.retain(|_, t| t.user_id() != id);
        Ok(())
    }
}

impl MemEntity for Item {
    fn map(state: &MemState) -> &BTreeMap<i32, Self> {
        &state.items
    }

    fn map_mut(state: &mut MemState) -> &mut BTreeMap<i32, Self> {
        &mut state.items
    }

    fn take_next_id(state: &mut MemState) -> i32 {
        state.next_item_id += 1;
        state.next_item_id
    }

    fn set_id(&mut self, id: i32) {
        self.assign_id(id);
    }

    fn before_delete(state: &mut MemState, id: i32) -> Result<(), DomainError> {
        if state
            .transacts
            .values()
            .any(|t| t.item_ids().contains(&id))
        {
            return Err(DomainError::conflict(
                "Referential constraint violated: item is referenced by a transaction",
            ));
        }
        Ok(())
    }
}

impl MemEntity for Transact {
    fn map(state: &MemState) -> &BTreeMap<i32, Self> {
        &state.transacts
    }

    fn map_mut(state: &mut MemState) -> &mut BTreeMap<i32, Self> {
        &mut state.transacts
    }

    fn take_next_id(state: &mut MemState) -> i32 {
        state.next_transact_id += 1;
        state.next_transact_id
    }

    fn set_id(&mut self, id: i32) {
        self.assign_id(id);
    }

    fn check_insert(state: &MemState, entity: &Self) -> Result<(), DomainError> {
        if !state.users.contains_key(&entity.user_id()) {
            return Err(DomainError::conflict(format!(
                "Referential constraint violated: user {} does not exist",
                entity.user_id()
            )));
        }
        for item_id in entity.item_ids() {
            if !state.items.contains_key(item_id) {
                return Err(DomainError::conflict(format!(
                    "Referential constraint violated: item {} does not exist",
                    item_id
                )));
            }
        }
        Ok(())
    }
}

impl MemEntity for AuthToken {
    fn map(state: &MemState) -> &BTreeMap<i32, Self> {
        &state.auth_tokens
    }

    fn map_mut(state: &mut MemState) -> &mut BTreeMap<i32, Self> {
        &mut state.auth_tokens
    }

    fn take_next_id(state: &mut MemState) -> i32 {
        state.next_auth_token_id += 1;
        state.next_auth_token_id
    }

    fn set_id(&mut self, id: i32) {
        self.assign_id(id);
    }

    fn check_insert(state: &MemState, entity: &Self) -> Result<(), DomainError> {
        if !state.users.contains_key(&entity.user_id()) {
            return Err(DomainError::conflict(format!(
                "Referential constraint violated: user {} does not exist",
                entity.user_id()
            )));
        }
        Ok(())
    }
}

/// Shared in-memory store; every unit of work built over it sees the same
/// state.
#[derive(Debug, Default)]
pub struct MemStore {
    state: Mutex<MemState>,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> &Mutex<MemState> {
        &self.state
    }

    /// Load the same starting data the SQL seed produces.
    pub async fn seed(&self, hasher: &dyn PasswordHasher) -> Result<(), DomainError> {
        use rust_decimal::Decimal;
        use std::str::FromStr;

        let mut state = self.state.lock().await;

        if !state.users.values().any(|u| u.email() == "admin@example.com") {
            let password_hash = hasher.hash("password123")?;
            let id = User::take_next_id(&mut *state);
            state
                .users
                .insert(id, User::from_storage(id, "admin", "admin@example.com", password_hash));
        }

        let items = [
            (1, "Épée de Feu", "Une épée enflammée", "150.0"),
            (2, "Potion de Soin", "Restaure la santé", "25.0"),
            (3, "Bouclier du Dragon", "Protection contre le feu", "200.0"),
        ];
        for (id, name, description, price) in items {
            let price = Decimal::from_str(price)
                .map_err(|e| DomainError::internal(format!("Bad seed price: {}", e)))?;
            state
                .items
                .entry(id)
                .or_insert_with(|| Item::with_id(id, name, description, price));
            state.next_item_id = state.next_item_id.max(id);
        }

        Ok(())
    }
}
