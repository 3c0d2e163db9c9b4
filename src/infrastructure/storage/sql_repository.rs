//! Generic SQL-backed repository
//!
//! One implementation serves every entity whose storage shape is a single
//! table: SQL is generated from the entity's table and column metadata, and
//! filters are translated clause by clause. Writes are staged on the shared
//! [`PgContext`] and applied by `save_changes`.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::context::{map_db_error, PgContext};
use super::writes::{DeleteWrite, InsertWrite, UpdateWrite};
use crate::domain::auth_token::{AuthToken, AuthTokenRepository};
use crate::domain::item::{Item, ItemRepository};
use crate::domain::repository::{Entity, FieldValue, Filter, PageRequest, Repository};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

fn bind_value_as<'q, E>(
    query: QueryAs<'q, Postgres, E, PgArguments>,
    value: FieldValue,
) -> QueryAs<'q, Postgres, E, PgArguments> {
    match value {
        FieldValue::Int(v) => query.bind(v),
        FieldValue::Text(v) => query.bind(v),
        FieldValue::Decimal(v) => query.bind(v),
        FieldValue::Timestamp(v) => query.bind(v),
    }
}

/// Render a filter as a WHERE fragment with 1-based placeholders.
/// Empty filters render as no fragment at all.
fn where_clause(filter: &Filter) -> String {
    if filter.is_empty() {
        return String::new();
    }

    let clauses = filter
        .clauses()
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(" AND ");

    format!(" WHERE {}", clauses)
}

pub struct SqlRepository<E> {
    context: Arc<PgContext>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> SqlRepository<E> {
    pub fn new(context: Arc<PgContext>) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }
}

impl<E> SqlRepository<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    fn select_prefix() -> String {
        format!("SELECT {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
    }

    async fn fetch_filtered(&self, filter: &Filter, suffix: &str) -> Result<Vec<E>, DomainError> {
        filter.check_columns::<E>()?;

        let sql = format!("{}{}{}", Self::select_prefix(), where_clause(filter), suffix);
        let mut query = sqlx::query_as::<_, E>(&sql);
        for (_, value) in filter.clauses() {
            query = bind_value_as(query, value.clone());
        }

        query
            .fetch_all(self.context.pool())
            .await
            .map_err(map_db_error)
    }
}

#[async_trait]
impl<E> Repository<E> for SqlRepository<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn add(&self, entity: E) -> Result<E, DomainError> {
        self.context
            .stage(Box::new(InsertWrite::new(entity.clone())))
            .await;
        Ok(entity)
    }

    async fn add_range(&self, entities: Vec<E>) -> Result<(), DomainError> {
        for entity in entities {
            self.context.stage(Box::new(InsertWrite::new(entity))).await;
        }
        Ok(())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<E>, DomainError> {
        let sql = format!("{} WHERE id = $1", Self::select_prefix());

        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(self.context.pool())
            .await
            .map_err(map_db_error)
    }

    async fn get_all(&self) -> Result<Vec<E>, DomainError> {
        self.fetch_filtered(&Filter::default(), " ORDER BY id").await
    }

    async fn find(&self, filter: Filter) -> Result<Vec<E>, DomainError> {
        self.fetch_filtered(&filter, " ORDER BY id").await
    }

    async fn first_matching(&self, filter: Filter) -> Result<Option<E>, DomainError> {
        let mut found = self.fetch_filtered(&filter, " ORDER BY id LIMIT 1").await?;
        Ok(found.pop())
    }

    async fn count(&self, filter: Option<Filter>) -> Result<u64, DomainError> {
        let filter = filter.unwrap_or_default();
        filter.check_columns::<E>()?;

        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            E::TABLE,
            where_clause(&filter)
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for (_, value) in filter.clauses() {
            query = match value.clone() {
                FieldValue::Int(v) => query.bind(v),
                FieldValue::Text(v) => query.bind(v),
                FieldValue::Decimal(v) => query.bind(v),
                FieldValue::Timestamp(v) => query.bind(v),
            };
        }

        let count = query
            .fetch_one(self.context.pool())
            .await
            .map_err(map_db_error)?;
        Ok(count as u64)
    }

    async fn get_page(&self, page_number: u32, page_size: u32) -> Result<Vec<E>, DomainError> {
        self.get_page_filtered(PageRequest::new(page_number, page_size))
            .await
            .map(|(entities, _)| entities)
    }

    async fn get_page_filtered(
        &self,
        request: PageRequest,
    ) -> Result<(Vec<E>, u64), DomainError> {
        request.check()?;

        let filter = request.filter.clone().unwrap_or_default();
        let order_column = match &request.order_by {
            Some(column) => {
                if !E::COLUMNS.contains(&column.as_str()) {
                    return Err(DomainError::validation(format!(
                        "Unknown column '{}' for {}",
                        column,
                        E::TABLE
                    )));
                }
                column.as_str()
            }
            None => "id",
        };
        let direction = if request.ascending { "ASC" } else { "DESC" };
        let offset = (request.page_number - 1) as i64 * request.page_size as i64;

        let suffix = format!(
            " ORDER BY {} {} LIMIT {} OFFSET {}",
            order_column, direction, request.page_size, offset
        );
        let entities = self.fetch_filtered(&filter, &suffix).await?;
        let total = self.count(request.filter).await?;

        Ok((entities, total))
    }

    async fn update(&self, entity: E) -> Result<(), DomainError> {
        if entity.id().is_none() {
            return Err(DomainError::validation("Cannot update an unsaved entity"));
        }

        self.context.stage(Box::new(UpdateWrite::new(entity))).await;
        Ok(())
    }

    async fn update_range(&self, entities: Vec<E>) -> Result<(), DomainError> {
        for entity in entities {
            self.update(entity).await?;
        }
        Ok(())
    }

    async fn remove(&self, entity: &E) -> Result<(), DomainError> {
        let id = entity
            .id()
            .ok_or_else(|| DomainError::validation("Cannot remove an unsaved entity"))?;

        self.context.stage(Box::new(DeleteWrite::<E>::new(id))).await;
        Ok(())
    }

    async fn remove_range(&self, entities: &[E]) -> Result<(), DomainError> {
        for entity in entities {
            self.remove(entity).await?;
        }
        Ok(())
    }

    async fn save_changes(&self) -> Result<u64, DomainError> {
        self.context.save_changes().await
    }
}

impl UserRepository for SqlRepository<User> {}

impl ItemRepository for SqlRepository<Item> {}

impl AuthTokenRepository for SqlRepository<AuthToken> {}
