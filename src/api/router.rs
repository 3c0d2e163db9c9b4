use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{auth_token, health, item, transact, user};
use crate::config::Environment;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let cors_permissive = state.environment == Environment::Development;

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/api/user", get(user::list))
        .route("/api/user/{id}", get(user::get_by_id))
        .route("/api/user/register", post(user::register))
        .route("/api/user/login", post(user::login))
        .route("/api/item", get(item::list))
        .route("/api/item/{id}", get(item::get_by_id))
        .route("/api/transaction", get(transact::list).post(transact::create))
        .route("/api/authtoken", get(auth_token::list))
        .with_state(state);

    // Browser frontends hit the API cross-origin only during local
    // development; production sits behind a same-origin proxy.
    if cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(TraceLayer::new_for_http())
}
