//!
//! # Repositories
//!
//! A single generic [`Repository`] trait covers the CRUD surface every entity needs.
//! Entities describe their own table layout through [`Entity`], which lets one
//! implementation per backend serve all of them:
//!
//! - [`PgRepository`] generates parameterised SQL for Postgres via `sqlx`.
//! - [`MemoryRepository`] keeps records in process and mirrors the same semantics,
//!   including unique columns. It backs `DATABASE_URL=memory://` and the test suite.
//!
//! Repository errors are plain [`AppError`]s and are surfaced unchanged to the services.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// A column value used for filtering and for writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// A record type persisted in its own table.
///
/// `COLUMNS` lists every column in the order produced by [`Entity::values`]; the
/// first one must be `id`.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const UNIQUE_COLUMNS: &'static [&'static str] = &[];

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn values(&self) -> Vec<Value>;
    /// Records a modification time.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Equality filters plus pagination. Results are always ordered by
/// `created_at`, then `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub conditions: Vec<(&'static str, Value)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value`. Conditions are ANDed.
    pub fn filter(mut self, column: &'static str, value: Value) -> Self {
        self.conditions.push((column, value));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Column position inside `E::COLUMNS`, rejecting names the entity does not have.
pub(crate) fn column_index<E: Entity>(column: &str) -> Result<usize, AppError> {
    E::COLUMNS
        .iter()
        .position(|candidate| *candidate == column)
        .ok_or_else(|| {
            AppError::InternalServerError(format!("unknown column {}.{}", E::TABLE, column))
        })
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find(&self, query: &Query) -> Result<Vec<E>, AppError>;

    async fn find_one(&self, query: &Query) -> Result<Option<E>, AppError> {
        let single = Query {
            limit: Some(1),
            ..query.clone()
        };
        Ok(self.find(&single).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, AppError> {
        self.find_one(&Query::new().filter("id", Value::Uuid(id)))
            .await
    }

    /// Inserts a new record. A clash on a unique column is a `Conflict`.
    async fn create(&self, entity: E) -> Result<E, AppError>;

    /// Overwrites every column of an existing record and refreshes `updated_at`.
    async fn update(&self, entity: E) -> Result<E, AppError>;

    /// Removes a record, `NotFound` if it was not there.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
