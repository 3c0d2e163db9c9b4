//! SQL storage: connection pooling, staged-write context, repositories,
//! migrations

mod context;
mod migrations;
mod postgres;
mod rows;
mod sql_repository;
mod transact_repository;
mod uow;
mod writes;

pub use context::{map_db_error, PgContext, StagedWrite};
pub use migrations::{
    run_schema_migrations, schema_migrations, seed_initial_data, Migration, PostgresMigrator,
};
pub use postgres::{connect, PostgresConfig};
pub use sql_repository::SqlRepository;
pub use transact_repository::PgTransactRepository;
pub use uow::{PgUnitOfWork, PgUnitOfWorkFactory};
pub use writes::{DeleteWrite, InsertWrite, TransactInsertWrite, UpdateWrite};
