//! Domain layer: entities, validation, repository and unit-of-work contracts

pub mod auth_token;
pub mod dto;
pub mod error;
pub mod item;
pub mod repository;
pub mod transact;
pub mod uow;
pub mod user;

pub use error::DomainError;
