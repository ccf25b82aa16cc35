use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{column_index, Entity, Query, Repository};
use crate::error::AppError;

/// In-process store with the same observable behaviour as [`super::PgRepository`].
pub struct MemoryRepository<E> {
    records: RwLock<Vec<E>>,
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Fails with `Conflict` if `candidate` shares a unique column value with any
    /// other stored record.
    fn check_unique(records: &[E], candidate: &E) -> Result<(), AppError> {
        let candidate_values = candidate.values();
        for column in E::UNIQUE_COLUMNS {
            let index = column_index::<E>(column)?;
            let clash = records.iter().any(|existing| {
                existing.id() != candidate.id()
                    && existing.values()[index] == candidate_values[index]
            });
            if clash {
                return Err(AppError::Conflict(format!(
                    "{} with this {} already exists",
                    E::TABLE,
                    column
                )));
            }
        }
        Ok(())
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn find(&self, query: &Query) -> Result<Vec<E>, AppError> {
        let filters = query
            .conditions
            .iter()
            .map(|(column, value)| column_index::<E>(column).map(|index| (index, value)))
            .collect::<Result<Vec<_>, AppError>>()?;

        let records = self.records.read().await;
        let mut matched: Vec<E> = records
            .iter()
            .filter(|record| {
                let values = record.values();
                filters.iter().all(|(index, value)| values[*index] == **value)
            })
            .cloned()
            .collect();
        drop(records);

        matched.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn create(&self, entity: E) -> Result<E, AppError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == entity.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                E::TABLE,
                entity.id()
            )));
        }
        Self::check_unique(&records, &entity)?;
        records.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, mut entity: E) -> Result<E, AppError> {
        let mut records = self.records.write().await;
        Self::check_unique(&records, &entity)?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == entity.id())
            .ok_or_else(|| AppError::NotFound("Record not found".into()))?;
        entity.touch(Utc::now());
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|existing| existing.id() != id);
        if records.len() == before {
            return Err(AppError::NotFound("Record not found".into()));
        }
        Ok(())
    }
}
