use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::{column_index, Entity, Query, Repository, Value};
use crate::error::AppError;

/// Postgres-backed repository. SQL is derived from the entity's column list and
/// every value is sent as a bind parameter.
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

fn bind<'q, O>(
    statement: QueryAs<'q, Postgres, O, PgArguments>,
    value: Value,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        Value::Uuid(v) => statement.bind(v),
        Value::Text(v) => statement.bind(v),
        Value::Bool(v) => statement.bind(v),
        Value::Timestamp(v) => statement.bind(v),
    }
}

fn select_sql<E: Entity>(query: &Query) -> Result<String, AppError> {
    let mut sql = format!("SELECT {} FROM {}", E::COLUMNS.join(", "), E::TABLE);

    let mut conditions = Vec::with_capacity(query.conditions.len());
    for (position, (column, _)) in query.conditions.iter().enumerate() {
        column_index::<E>(column)?;
        conditions.push(format!("{} = ${}", column, position + 1));
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY created_at, id");
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit.max(0)));
    }
    if let Some(offset) = query.offset {
        sql.push_str(&format!(" OFFSET {}", offset.max(0)));
    }
    Ok(sql)
}

fn placeholders(range: std::ops::Range<usize>) -> impl Iterator<Item = String> {
    range.map(|n| format!("${}", n + 1))
}

fn insert_sql<E: Entity>() -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders(0..E::COLUMNS.len())
            .collect::<Vec<_>>()
            .join(", "),
        E::COLUMNS.join(", ")
    )
}

/// `$1` is the id; every other column is overwritten.
fn update_sql<E: Entity>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .zip(placeholders(0..E::COLUMNS.len()))
        .skip(1)
        .map(|(column, placeholder)| format!("{} = {}", column, placeholder))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = $1 RETURNING {}",
        E::TABLE,
        assignments,
        E::COLUMNS.join(", ")
    )
}

fn delete_sql<E: Entity>() -> String {
    format!("DELETE FROM {} WHERE id = $1", E::TABLE)
}

#[async_trait]
impl<E> Repository<E> for PgRepository<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn find(&self, query: &Query) -> Result<Vec<E>, AppError> {
        let sql = select_sql::<E>(query)?;
        let mut statement = sqlx::query_as::<_, E>(&sql);
        for (_, value) in &query.conditions {
            statement = bind(statement, value.clone());
        }
        Ok(statement.fetch_all(&self.pool).await?)
    }

    async fn create(&self, entity: E) -> Result<E, AppError> {
        let sql = insert_sql::<E>();
        let mut statement = sqlx::query_as::<_, E>(&sql);
        for value in entity.values() {
            statement = bind(statement, value);
        }
        Ok(statement.fetch_one(&self.pool).await?)
    }

    async fn update(&self, mut entity: E) -> Result<E, AppError> {
        entity.touch(Utc::now());
        let sql = update_sql::<E>();
        let mut statement = sqlx::query_as::<_, E>(&sql);
        for value in entity.values() {
            statement = bind(statement, value);
        }
        statement
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(&delete_sql::<E>())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, Todo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_sql() {
        let owner = Uuid::new_v4();
        let query = Query::new()
            .filter("user_id", Value::Uuid(owner))
            .filter("done", Value::Bool(false))
            .limit(5)
            .offset(10);

        assert_eq!(
            select_sql::<Task>(&query).unwrap(),
            "SELECT id, user_id, title, description, done, created_at, updated_at FROM tasks \
             WHERE user_id = $1 AND done = $2 ORDER BY created_at, id LIMIT 5 OFFSET 10"
        );
        assert_eq!(
            select_sql::<Todo>(&Query::new()).unwrap(),
            "SELECT id, title, description, done, created_at, updated_at FROM todos \
             ORDER BY created_at, id"
        );
    }

    #[test]
    fn test_select_sql_rejects_unknown_column() {
        let query = Query::new().filter("user_id", Value::Bool(true));
        assert!(select_sql::<Todo>(&query).is_err());
    }

    #[test]
    fn test_write_sql() {
        assert_eq!(
            insert_sql::<Todo>(),
            "INSERT INTO todos (id, title, description, done, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, description, done, created_at, updated_at"
        );
        assert_eq!(
            update_sql::<Todo>(),
            "UPDATE todos SET title = $2, description = $3, done = $4, created_at = $5, \
             updated_at = $6 WHERE id = $1 \
             RETURNING id, title, description, done, created_at, updated_at"
        );
        assert_eq!(delete_sql::<Todo>(), "DELETE FROM todos WHERE id = $1");
    }
}
