//! In-memory storage backend, used by tests and local development

mod context;
mod repository;
mod store;
mod uow;

pub use context::{MemContext, MemWrite};
pub use repository::MemRepository;
pub use store::{MemEntity, MemState, MemStore};
pub use uow::{MemUnitOfWork, MemUnitOfWorkFactory};
