use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreateTaskInput, ListQuery, Task, UpdateTaskInput};
use crate::repository::{Repository, Value};

use super::page_query;

/// CRUD over tasks scoped to their owner.
///
/// Listing only ever returns the caller's tasks. Reading, updating or deleting a
/// task that belongs to someone else is `Forbidden`; a task that does not exist
/// at all is `NotFound`.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn Repository<Task>>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn Repository<Task>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, params: ListQuery) -> Result<Vec<Task>, AppError> {
        params.validate()?;
        let mut query = page_query(&params).filter("user_id", Value::Uuid(owner));
        if let Some(done) = params.done {
            query = query.filter("done", Value::Bool(done));
        }
        self.repo.find(&query).await
    }

    pub async fn create(&self, owner: Uuid, input: CreateTaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.repo.create(Task::new(input, owner)).await?;
        info!("user {} created task {}", owner, task.id);
        Ok(task)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task, AppError> {
        let task = self.repo.find_by_id(id).await?.ok_or_else(|| {
            warn!("task {} not found", id);
            AppError::NotFound("Task not found".into())
        })?;

        if !task.is_owned_by(owner) {
            warn!("user {} denied access to task {}", owner, id);
            return Err(AppError::Forbidden(
                "You do not have access to this task".into(),
            ));
        }
        Ok(task)
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: UpdateTaskInput,
    ) -> Result<Task, AppError> {
        patch.validate()?;
        let mut task = self.get(owner, id).await?;
        task.apply(patch);
        let task = self.repo.update(task).await?;
        info!("user {} updated task {}", owner, id);
        Ok(task)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get(owner, id).await?;
        self.repo.delete(id).await?;
        info!("user {} deleted task {}", owner, id);
        Ok(())
    }
}
