//! Item entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::repository::{Entity, FieldValue};

/// Purchasable catalog item. Many-to-many with transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    id: Option<i32>,
    name: String,
    description: String,
    /// Non-negative price
    price: Decimal,
}

impl Item {
    /// Create a new, not-yet-persisted item.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    /// Rebuild a persisted item from storage columns.
    pub fn with_id(
        id: i32,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
    }

    pub(crate) fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

impl Entity for Item {
    const TABLE: &'static str = "items";
    const COLUMNS: &'static [&'static str] = &["id", "name", "description", "price"];

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => self.id.map(FieldValue::Int),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "description" => Some(FieldValue::Text(self.description.clone())),
            "price" => Some(FieldValue::Decimal(self.price)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_item() {
        let item = Item::new("Potion", "Heals 50 HP", dec!(25.0));

        assert_eq!(item.id(), None);
        assert_eq!(item.name(), "Potion");
        assert_eq!(item.price(), dec!(25.0));
    }

    #[test]
    fn test_price_serializes_as_number() {
        let item = Item::with_id(1, "Potion", "", dec!(25.0));

        let json = serde_json::to_value(&item).unwrap();
        assert!(json["price"].is_number());
    }
}
