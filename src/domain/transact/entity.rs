//! Transaction entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::repository::{Entity, FieldValue};

/// A purchase by one user of one or more items.
///
/// The item references live in a join table; the entity carries them as a
/// list of item ids. The schema permits an empty list, the service layer
/// rejects it on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transact {
    id: Option<i32>,
    transaction_date: DateTime<Utc>,
    user_id: i32,
    item_ids: Vec<i32>,
}

impl Transact {
    /// Create a new, not-yet-persisted transaction.
    pub fn new(user_id: i32, transaction_date: DateTime<Utc>, item_ids: Vec<i32>) -> Self {
        Self {
            id: None,
            transaction_date,
            user_id,
            item_ids,
        }
    }

    /// Rebuild a persisted transaction from storage columns.
    pub fn from_storage(
        id: i32,
        user_id: i32,
        transaction_date: DateTime<Utc>,
        item_ids: Vec<i32>,
    ) -> Self {
        Self {
            id: Some(id),
            transaction_date,
            user_id,
            item_ids,
        }
    }

    pub fn transaction_date(&self) -> DateTime<Utc> {
        self.transaction_date
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn item_ids(&self) -> &[i32] {
        &self.item_ids
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

impl Entity for Transact {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] = &["id", "transaction_date", "user_id"];

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => self.id.map(FieldValue::Int),
            "transaction_date" => Some(FieldValue::Timestamp(self.transaction_date)),
            "user_id" => Some(FieldValue::Int(self.user_id)),
            _ => None,
        }
    }
}
