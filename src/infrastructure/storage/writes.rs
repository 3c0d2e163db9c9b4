//! Staged write commands built from entity metadata
//!
//! Inserts, updates and deletes are expressed as SQL generated from the
//! entity's table name and column whitelist, with values bound through
//! [`FieldValue`]. The transaction insert is the one bespoke command, since
//! it also writes join rows.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgConnection, Postgres, Row};

use super::context::{map_db_error, StagedWrite};
use crate::domain::repository::{Entity, FieldValue};
use crate::domain::transact::Transact;
use crate::domain::DomainError;

/// Bind a typed field value onto a query.
pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    value: FieldValue,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        FieldValue::Int(v) => query.bind(v),
        FieldValue::Text(v) => query.bind(v),
        FieldValue::Decimal(v) => query.bind(v),
        FieldValue::Timestamp(v) => query.bind(v),
    }
}

fn data_columns<E: Entity>() -> Vec<&'static str> {
    E::COLUMNS.iter().copied().filter(|c| *c != "id").collect()
}

fn field_of<E: Entity>(entity: &E, column: &str) -> Result<FieldValue, DomainError> {
    entity.field(column).ok_or_else(|| {
        DomainError::internal(format!("Entity {} has no value for '{}'", E::TABLE, column))
    })
}

/// `INSERT INTO <table> (<columns>) VALUES (...)`; identity comes from the
/// table's sequence.
pub struct InsertWrite<E: Entity> {
    entity: E,
}

impl<E: Entity> InsertWrite<E> {
    pub fn new(entity: E) -> Self {
        Self { entity }
    }
}

#[async_trait]
impl<E: Entity> StagedWrite for InsertWrite<E> {
    async fn apply(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let columns = data_columns::<E>();
        let placeholders = (1..=columns.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            columns.join(", "),
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for column in &columns {
            query = bind_value(query, field_of(&self.entity, column)?);
        }

        let result = query.execute(conn).await.map_err(map_db_error)?;
        Ok(result.rows_affected())
    }
}

/// `UPDATE <table> SET ... WHERE id = $n`.
pub struct UpdateWrite<E: Entity> {
    entity: E,
}

impl<E: Entity> UpdateWrite<E> {
    pub fn new(entity: E) -> Self {
        Self { entity }
    }
}

#[async_trait]
impl<E: Entity> StagedWrite for UpdateWrite<E> {
    async fn apply(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let id = self
            .entity
            .id()
            .ok_or_else(|| DomainError::internal("Cannot update an unsaved entity"))?;

        let columns = data_columns::<E>();
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", c, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${}",
            E::TABLE,
            assignments,
            columns.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for column in &columns {
            query = bind_value(query, field_of(&self.entity, column)?);
        }
        query = query.bind(id);

        let result = query.execute(conn).await.map_err(map_db_error)?;
        Ok(result.rows_affected())
    }
}

/// `DELETE FROM <table> WHERE id = $1`.
pub struct DeleteWrite<E: Entity> {
    id: i32,
    _marker: std::marker::PhantomData<fn() -> E>,
}

impl<E: Entity> DeleteWrite<E> {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            _marker: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> StagedWrite for DeleteWrite<E> {
    async fn apply(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);

        let result = sqlx::query(&sql)
            .bind(self.id)
            .execute(conn)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected())
    }
}

/// Insert a transaction row plus its item join rows. Missing users or items
/// surface as referential-constraint conflicts and reject the whole batch.
pub struct TransactInsertWrite {
    transact: Transact,
}

impl TransactInsertWrite {
    pub fn new(transact: Transact) -> Self {
        Self { transact }
    }
}

#[async_trait]
impl StagedWrite for TransactInsertWrite {
    async fn apply(&self, conn: &mut PgConnection) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "INSERT INTO transactions (transaction_date, user_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(self.transact.transaction_date())
        .bind(self.transact.user_id())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        let transaction_id: i32 = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Missing returned id: {}", e)))?;

        let mut affected = 1;
        for item_id in self.transact.item_ids() {
            let result = sqlx::query(
                "INSERT INTO transaction_items (transaction_id, item_id) VALUES ($1, $2)",
            )
            .bind(transaction_id)
            .bind(item_id)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;
            affected += result.rows_affected();
        }

        Ok(affected)
    }
}
