//! Item entity, validation and repository contract

mod entity;
mod repository;
mod validation;

pub use entity::Item;
pub use repository::ItemRepository;
pub use validation::{validate_item_name, validate_price, ItemValidationError};
