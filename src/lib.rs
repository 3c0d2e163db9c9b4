//! Transact API
//!
//! A micro-transactions backend: user registration and login, an item
//! catalog, purchase transactions and auth token records, served over a
//! uniform JSON envelope. Storage goes through a generic repository and
//! staged-write unit of work, backed by PostgreSQL in production and an
//! in-memory twin in tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::uow::UnitOfWorkFactory;
use infrastructure::auth::{Argon2Hasher, JwtConfig, JwtGenerator, JwtService, PasswordHasher};
use infrastructure::mapping::DtoMapper;
use infrastructure::memory::{MemStore, MemUnitOfWorkFactory};
use infrastructure::services::{AuthTokenService, ItemService, TransactService, UserService};
use infrastructure::storage::{self, PgUnitOfWorkFactory, PostgresConfig};

/// Create application state backed by PostgreSQL: connect, migrate, seed.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = storage::connect(&PostgresConfig::from(&config.database)).await?;
    storage::run_schema_migrations(&pool).await?;

    let hasher = Arc::new(Argon2Hasher::new());
    storage::seed_initial_data(&pool, hasher.as_ref()).await?;

    let uow_factory: Arc<dyn UnitOfWorkFactory> = Arc::new(PgUnitOfWorkFactory::new(pool));
    Ok(build_app_state(config, uow_factory, hasher))
}

/// Create application state over the in-memory backend, seeded with the
/// same starting data. Used by tests and local development without a
/// database.
pub async fn create_in_memory_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let store = MemStore::new();
    let hasher = Arc::new(Argon2Hasher::new());
    store.seed(hasher.as_ref()).await?;

    let uow_factory: Arc<dyn UnitOfWorkFactory> = Arc::new(MemUnitOfWorkFactory::new(store));
    Ok(build_app_state(config, uow_factory, hasher))
}

fn build_app_state(
    config: &AppConfig,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    hasher: Arc<Argon2Hasher>,
) -> AppState {
    let jwt: Arc<dyn JwtGenerator> = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_issuer.clone(),
        config.auth.jwt_audience.clone(),
        config.auth.token_expiration_minutes,
    )));
    let hasher: Arc<dyn PasswordHasher> = hasher;
    let mapper = Arc::new(DtoMapper::new());

    AppState {
        user_service: Arc::new(UserService::new(
            uow_factory.clone(),
            mapper.clone(),
            hasher.clone(),
            jwt.clone(),
        )),
        item_service: Arc::new(ItemService::new(uow_factory.clone(), mapper.clone())),
        transact_service: Arc::new(TransactService::new(uow_factory.clone(), mapper.clone())),
        auth_token_service: Arc::new(AuthTokenService::new(uow_factory.clone(), mapper)),
        jwt,
        uow_factory,
        environment: config.server.environment,
    }
}
