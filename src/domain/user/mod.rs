//! User entity, validation and repository contract

mod entity;
mod repository;
mod validation;

pub use entity::User;
pub use repository::UserRepository;
pub use validation::{validate_email, validate_password, validate_username, UserValidationError};
