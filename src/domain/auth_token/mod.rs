//! Auth token entity and repository contract

mod entity;
mod repository;

pub use entity::{AuthToken, TOKEN_LIFETIME_SECS};
pub use repository::AuthTokenRepository;
