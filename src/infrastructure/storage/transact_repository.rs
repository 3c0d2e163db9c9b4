//! SQL-backed transaction repository
//!
//! Transactions span two tables (the row itself plus item join rows), so
//! this repository does not go through the generic SQL path: reads fold the
//! join rows into an `item_ids` array, inserts write both tables in one
//! staged command.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::context::{map_db_error, PgContext};
use super::writes::{bind_value, DeleteWrite, TransactInsertWrite, UpdateWrite};
use crate::domain::repository::{Entity, Filter, PageRequest, Repository};
use crate::domain::transact::{Transact, TransactRepository};
use crate::domain::DomainError;

const SELECT_WITH_ITEMS: &str = "SELECT t.id, t.transaction_date, t.user_id, \
     COALESCE(array_agg(ti.item_id ORDER BY ti.id) FILTER (WHERE ti.item_id IS NOT NULL), '{}') AS item_ids \
     FROM transactions t \
     LEFT JOIN transaction_items ti ON ti.transaction_id = t.id";

fn row_to_transact(row: &PgRow) -> Result<Transact, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Malformed transaction row: {}", e));

    Ok(Transact::from_storage(
        row.try_get("id").map_err(read)?,
        row.try_get("user_id").map_err(read)?,
        row.try_get("transaction_date").map_err(read)?,
        row.try_get::<Vec<i32>, _>("item_ids").map_err(read)?,
    ))
}

/// WHERE fragment over the transaction row's own columns, qualified with
/// the `t` alias.
fn where_clause(filter: &Filter) -> String {
    if filter.is_empty() {
        return String::new();
    }

    let clauses = filter
        .clauses()
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("t.{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");

    format!(" WHERE {}", clauses)
}

pub struct PgTransactRepository {
    context: Arc<PgContext>,
}

impl PgTransactRepository {
    pub fn new(context: Arc<PgContext>) -> Self {
        Self { context }
    }

    async fn fetch_filtered(
        &self,
        filter: &Filter,
        suffix: &str,
    ) -> Result<Vec<Transact>, DomainError> {
        filter.check_columns::<Transact>()?;

        let sql = format!(
            "{}{} GROUP BY t.id{}",
            SELECT_WITH_ITEMS,
            where_clause(filter),
            suffix
        );
        let mut query = sqlx::query(&sql);
        for (_, value) in filter.clauses() {
            query = bind_value(query, value.clone());
        }

        let rows = query
            .fetch_all(self.context.pool())
            .await
            .map_err(map_db_error)?;

        rows.iter().map(row_to_transact).collect()
    }
}

#[async_trait]
impl Repository<Transact> for PgTransactRepository {
    async fn add(&self, entity: Transact) -> Result<Transact, DomainError> {
        self.context
            .stage(Box::new(TransactInsertWrite::new(entity.clone())))
            .await;
        Ok(entity)
    }

    async fn add_range(&self, entities: Vec<Transact>) -> Result<(), DomainError> {
        for entity in entities {
            self.context
                .stage(Box::new(TransactInsertWrite::new(entity)))
                .await;
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Transact>, DomainError> {
        let mut found = self
            .fetch_filtered(&Filter::eq("id", id), " ORDER BY t.id LIMIT 1")
            .await?;
        Ok(found.pop())
    }

    async fn get_all(&self) -> Result<Vec<Transact>, DomainError> {
        self.fetch_filtered(&Filter::default(), " ORDER BY t.id")
            .await
    }

    async fn find(&self, filter: Filter) -> Result<Vec<Transact>, DomainError> {
        self.fetch_filtered(&filter, " ORDER BY t.id").await
    }

    async fn first_matching(&self, filter: Filter) -> Result<Option<Transact>, DomainError> {
        let mut found = self.fetch_filtered(&filter, " ORDER BY t.id LIMIT 1").await?;
        Ok(found.pop())
    }

    async fn count(&self, filter: Option<Filter>) -> Result<u64, DomainError> {
        let filter = filter.unwrap_or_default();
        filter.check_columns::<Transact>()?;

        let sql = format!(
            "SELECT COUNT(*) FROM transactions t{}",
            where_clause(&filter)
        );
        let mut query = sqlx::query(&sql);
        for (_, value) in filter.clauses() {
            query = bind_value(query, value.clone());
        }

        let row = query
            .fetch_one(self.context.pool())
            .await
            .map_err(map_db_error)?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| DomainError::storage(format!("Malformed count row: {}", e)))?;
        Ok(count as u64)
    }

    async fn get_page(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<Transact>, DomainError> {
        self.get_page_filtered(PageRequest::new(page_number, page_size))
            .await
            .map(|(entities, _)| entities)
    }

    async fn get_page_filtered(
        &self,
        request: PageRequest,
    ) -> Result<(Vec<Transact>, u64), DomainError> {
        request.check()?;

        let filter = request.filter.clone().unwrap_or_default();
        let order_column = match &request.order_by {
            Some(column) => {
                if !Transact::COLUMNS.contains(&column.as_str()) {
                    return Err(DomainError::validation(format!(
                        "Unknown column '{}' for transactions",
                        column
                    )));
                }
                column.as_str()
            }
            None => "id",
        };
        let direction = if request.ascending { "ASC" } else { "DESC" };
        let offset = (request.page_number - 1) as i64 * request.page_size as i64;

        let suffix = format!(
            " ORDER BY t.{} {} LIMIT {} OFFSET {}",
            order_column, direction, request.page_size, offset
        );
        let entities = self.fetch_filtered(&filter, &suffix).await?;
        let total = self.count(request.filter).await?;

        Ok((entities, total))
    }

    /// Updates touch only the transaction row's own columns; item join rows
    /// are fixed at creation.
    async fn update(&self, entity: Transact) -> Result<(), DomainError> {
        if entity.id().is_none() {
            return Err(DomainError::validation("Cannot update an unsaved entity"));
        }

        self.context.stage(Box::new(UpdateWrite::new(entity))).await;
        Ok(())
    }

    async fn update_range(&self, entities: Vec<Transact>) -> Result<(), DomainError> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn remove(&self, entity: &Transact) -> Result<(), DomainError> {
        let id = entity
            .id()
            .ok_or_else(|| DomainError::validation("Cannot remove an unsaved entity"))?;

        // Join rows go with the transaction via ON DELETE CASCADE.
        self.context
            .stage(Box::new(DeleteWrite::<Transact>::new(id)))
            .await;
        Ok(())
    }

    async fn remove_range(&self, entities: &[Transact]) -> Result<(), DomainError> {
        for entity in entities {
            self.remove(entity).await?;
        }
        Ok(())
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        self.context.save_changes().await
    }
}

impl TransactRepository for PgTransactRepository {}
