//! Generic repository contract shared by every entity type.
//!
//! Write operations (`add`, `update`, `remove`) stage changes against the
//! owning unit of work; nothing reaches storage until `save_changes` runs.
//! Read operations hit storage immediately.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::DomainError;

/// A single typed field value, used by [`Filter`] clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Text(String),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Metadata every persisted entity exposes to the generic repository.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Table name in storage.
    const TABLE: &'static str;

    /// Column whitelist; filter and ordering columns are checked against it.
    const COLUMNS: &'static [&'static str];

    /// Storage-assigned identity; `None` until the entity has been saved.
    fn id(&self) -> Option<i32>;

    /// Read a column value off the entity, for in-memory filter evaluation.
    fn field(&self, column: &str) -> Option<FieldValue>;
}

/// Conjunction of equality clauses over entity columns.
///
/// Every lookup the services need is a column equality, so the typed form
/// stays translatable to SQL and checkable against the column whitelist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, FieldValue)>,
}

impl Filter {
    /// Single-clause filter: `column = value`.
    pub fn eq(column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            clauses: vec![(column.into(), value.into())],
        }
    }

    /// Add another `column = value` clause (AND semantics).
    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.clauses.push((column.into(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[(String, FieldValue)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Reject clauses naming columns outside the entity's whitelist.
    pub fn check_columns<E: Entity>(&self) -> Result<(), DomainError> {
        for (column, _) in &self.clauses {
            if !E::COLUMNS.contains(&column.as_str()) {
                return Err(DomainError::validation(format!(
                    "Unknown column '{}' for {}",
                    column,
                    E::TABLE
                )));
            }
        }
        Ok(())
    }

    /// Evaluate the filter against an in-memory entity.
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        self.clauses
            .iter()
            .all(|(column, value)| entity.field(column).as_ref() == Some(value))
    }
}

/// Filtered, ordered page request for [`Repository::get_page_filtered`].
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// 1-based page number.
    pub page_number: u32,
    pub page_size: u32,
    pub filter: Option<Filter>,
    /// Column to order by; defaults to the primary key.
    pub order_by: Option<String>,
    pub ascending: bool,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            filter: None,
            order_by: None,
            ascending: true,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order_by = Some(column.into());
        self.ascending = ascending;
        self
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if self.page_number == 0 {
            return Err(DomainError::validation("Page numbers start at 1"));
        }
        if self.page_size == 0 {
            return Err(DomainError::validation("Page size must be at least 1"));
        }
        Ok(())
    }
}

/// Generic CRUD + query contract, one entity type at a time.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Stage an insert. Identity is assigned by storage at save time.
    async fn add(&self, entity: E) -> Result<E, DomainError>;

    /// Stage multiple inserts.
    async fn add_range(&self, entities: Vec<E>) -> Result<(), DomainError>;

    /// Point lookup by primary key.
    async fn get_by_id(&self, id: i32) -> Result<Option<E>, DomainError>;

    /// Unrestricted scan. No implicit pagination; avoid on large tables.
    async fn get_all(&self) -> Result<Vec<E>, DomainError>;

    /// Filtered scan.
    async fn find(&self, filter: Filter) -> Result<Vec<E>, DomainError>;

    /// First entity matching the filter, if any.
    async fn first_matching(&self, filter: Filter) -> Result<Option<E>, DomainError>;

    /// Whether any entity matches the filter.
    async fn exists(&self, filter: Filter) -> Result<bool, DomainError> {
        Ok(self.first_matching(filter).await?.is_some())
    }

    /// Count entities, optionally filtered.
    async fn count(&self, filter: Option<Filter>) -> Result<u64, DomainError>;

    /// Offset/limit page ordered by primary key; page numbers are 1-based.
    async fn get_page(&self, page_number: u32, page_size: u32) -> Result<Vec<E>, DomainError>;

    /// Filtered and ordered page plus the total matching count.
    async fn get_page_filtered(
        &self,
        request: PageRequest,
    ) -> Result<(Vec<E>, u64), DomainError>;

    /// Stage an update. The entity must already carry its identity.
    async fn update(&self, entity: E) -> Result<(), DomainError>;

    /// Stage multiple updates.
    async fn update_range(&self, entities: Vec<E>) -> Result<(), DomainError>;

    /// Stage a delete.
    async fn remove(&self, entity: &E) -> Result<(), DomainError>;

    /// Stage multiple deletes.
    async fn remove_range(&self, entities: &[E]) -> Result<(), DomainError>;

    /// Flush every staged change of the owning unit of work.
    /// Returns the affected row count.
    async fn save_changes(&self) -> Result<u64, DomainError>;

    /// Eager-load related data by name. Not supported by the generic
    /// implementation; repositories that need related data override their
    /// reads instead.
    async fn get_with_includes(
        &self,
        filter: Filter,
        include_properties: &[&str],
    ) -> Result<Option<E>, DomainError> {
        let _ = (filter, include_properties);
        Err(DomainError::unsupported(
            "eager loading by property name is not supported",
        ))
    }

    /// Raw-query escape hatch. Not supported.
    async fn from_sql_raw(&self, sql: &str) -> Result<Vec<E>, DomainError> {
        let _ = sql;
        Err(DomainError::unsupported("raw SQL queries are not supported"))
    }
}
