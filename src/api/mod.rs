//! HTTP layer: router, handlers, envelope, extractors

pub mod auth_token;
pub mod envelope;
pub mod extract;
pub mod health;
pub mod item;
pub mod middleware;
pub mod router;
pub mod state;
pub mod transact;
pub mod user;

pub use envelope::ApiResponse;
pub use router::create_router;
pub use state::AppState;
