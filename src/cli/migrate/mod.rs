//! Migrate command - applies schema migrations and seed data

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::auth::Argon2Hasher;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{self, PostgresConfig, PostgresMigrator};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let pool = storage::connect(&PostgresConfig::from(&config.database)).await?;

    storage::run_schema_migrations(&pool).await?;
    storage::seed_initial_data(&pool, &Argon2Hasher::new()).await?;

    let version = PostgresMigrator::new(pool).current_version().await?;
    info!(?version, "Migrations applied");

    Ok(())
}
