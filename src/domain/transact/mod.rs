//! Transaction entity and repository contract

mod entity;
mod repository;

pub use entity::Transact;
pub use repository::TransactRepository;
