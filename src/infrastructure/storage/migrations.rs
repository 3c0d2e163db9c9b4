//! Database migrations and initial data

use sqlx::postgres::PgPool;

use crate::domain::DomainError;
use crate::infrastructure::auth::PasswordHasher;

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// PostgreSQL migrator tracking applied versions in a `_migrations` table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check migration status: {}", e)))
    }

    /// Runs a single migration, skipping it when already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(());
        }

        // raw_sql so a migration may carry several statements
        sqlx::raw_sql(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tracing::info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(())
    }

    /// Reverts a single migration when it has been applied
    pub async fn revert_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(());
        }

        sqlx::raw_sql(&migration.down)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to revert migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(())
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// Schema migrations, in apply order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                username VARCHAR(50) NOT NULL,
                email VARCHAR(100) NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        ),
        Migration::new(
            2,
            "Create items table",
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id SERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL,
                description TEXT NOT NULL,
                price NUMERIC(18, 2) NOT NULL
            );
            "#,
            "DROP TABLE IF EXISTS items;",
        ),
        Migration::new(
            3,
            "Create auth_tokens table",
            r#"
            CREATE TABLE IF NOT EXISTS auth_tokens (
                id SERIAL PRIMARY KEY,
                emission_date TIMESTAMPTZ NOT NULL,
                expiration_date TIMESTAMPTZ NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_auth_tokens_user_id ON auth_tokens(user_id);
            "#,
            "DROP TABLE IF EXISTS auth_tokens;",
        ),
        Migration::new(
            4,
            "Create transactions tables",
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id SERIAL PRIMARY KEY,
                transaction_date TIMESTAMPTZ NOT NULL,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions(user_id);
            CREATE TABLE IF NOT EXISTS transaction_items (
                id SERIAL PRIMARY KEY,
                transaction_id INTEGER NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
                item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE RESTRICT
            );
            CREATE INDEX IF NOT EXISTS idx_transaction_items_transaction_id
                ON transaction_items(transaction_id);
            "#,
            r#"
            DROP TABLE IF EXISTS transaction_items;
            DROP TABLE IF EXISTS transactions;
            "#,
        ),
    ]
}

/// Runs all pending schema migrations
pub async fn run_schema_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in schema_migrations() {
        migrator.run_migration(&migration).await?;
    }

    Ok(())
}

/// Seeds the admin account and the starting catalog. Idempotent: existing
/// rows are left alone. The admin password is hashed here rather than baked
/// into migration SQL so the hash gets a fresh salt per installation.
pub async fn seed_initial_data(
    pool: &PgPool,
    hasher: &dyn PasswordHasher,
) -> Result<(), DomainError> {
    let admin_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind("admin@example.com")
            .fetch_one(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check seed user: {}", e)))?;

    if !admin_exists {
        let password_hash = hasher.hash("password123")?;
        sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)")
            .bind("admin")
            .bind("admin@example.com")
            .bind(&password_hash)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to seed admin user: {}", e)))?;

        tracing::info!("Seeded admin user");
    }

    let items: [(i32, &str, &str, &str); 3] = [
        (1, "Épée de Feu", "Une épée enflammée", "150.0"),
        (2, "Potion de Soin", "Restaure la santé", "25.0"),
        (3, "Bouclier du Dragon", "Protection contre le feu", "200.0"),
    ];

    for (id, name, description, price) in items {
        sqlx::query(
            "INSERT INTO items (id, name, description, price) \
             VALUES ($1, $2, $3, $4::numeric) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to seed items: {}", e)))?;
    }

    // Explicit seed ids bypass the sequence; move it past them.
    sqlx::query("SELECT setval('items_id_seq', GREATEST((SELECT MAX(id) FROM items), 1))")
        .execute(pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to advance items sequence: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creation() {
        let migration = Migration::new(1, "Test migration", "CREATE TABLE test", "DROP TABLE test");

        assert_eq!(migration.version, 1);
        assert_eq!(migration.description, "Test migration");
    }

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert!(!migrations.is_empty());
        for i in 1..migrations.len() {
            assert!(
                migrations[i].version > migrations[i - 1].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_schema_migrations_content() {
        for migration in schema_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.is_empty());
            assert!(!migration.down.is_empty());
        }
    }
}
