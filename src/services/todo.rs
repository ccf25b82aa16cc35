use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{CreateTodoInput, ListQuery, Todo, UpdateTodoInput};
use crate::repository::{Repository, Value};

use super::page_query;

/// CRUD over todos. Each operation is one repository round trip, plus a read for
/// updates.
#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn Repository<Todo>>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn Repository<Todo>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, params: ListQuery) -> Result<Vec<Todo>, AppError> {
        params.validate()?;
        let mut query = page_query(&params);
        if let Some(done) = params.done {
            query = query.filter("done", Value::Bool(done));
        }
        self.repo.find(&query).await
    }

    pub async fn create(&self, input: CreateTodoInput) -> Result<Todo, AppError> {
        input.validate()?;
        let todo = self.repo.create(Todo::new(input)).await?;
        info!("created todo {}", todo.id);
        Ok(todo)
    }

    pub async fn get(&self, id: Uuid) -> Result<Todo, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| {
            warn!("todo {} not found", id);
            AppError::NotFound("Todo not found".into())
        })
    }

    pub async fn update(&self, id: Uuid, patch: UpdateTodoInput) -> Result<Todo, AppError> {
        patch.validate()?;
        let mut todo = self.get(id).await?;
        todo.apply(patch);
        let todo = self.repo.update(todo).await?;
        info!("updated todo {}", id);
        Ok(todo)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                info!("deleted todo {}", id);
                Ok(())
            }
            Err(AppError::NotFound(_)) => {
                warn!("todo {} not found", id);
                Err(AppError::NotFound("Todo not found".into()))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use pretty_assertions::assert_eq;

    fn service() -> TodoService {
        TodoService::new(Arc::new(MemoryRepository::<Todo>::new()))
    }

    fn input(title: &str, description: &str) -> CreateTodoInput {
        CreateTodoInput {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_create_assigns_id_and_not_done() {
        let service = service();
        let todo = service.create(input("Groceries", "Milk")).await.unwrap();

        assert!(!todo.id.is_nil());
        assert!(!todo.done);
        assert_eq!(service.get(todo.id).await.unwrap(), todo);
    }

    #[actix_rt::test]
    async fn test_create_rejects_invalid_input() {
        let result = service().create(input("", "Milk")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_get_missing_is_not_found() {
        let result = service().get(Uuid::new_v4()).await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Todo not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_update_single_field_keeps_others() {
        let service = service();
        let todo = service.create(input("Groceries", "Milk")).await.unwrap();

        let updated = service
            .update(
                todo.id,
                UpdateTodoInput {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.done);
        assert_eq!(updated.title, "Groceries");
        assert_eq!(updated.description, "Milk");
        assert_eq!(updated.created_at, todo.created_at);

        let missing = service
            .update(Uuid::new_v4(), UpdateTodoInput::default())
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let todo = service.create(input("Groceries", "")).await.unwrap();

        service.delete(todo.id).await.unwrap();
        assert!(matches!(
            service.get(todo.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(todo.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_list_filters_by_done() {
        let service = service();
        let first = service.create(input("first", "")).await.unwrap();
        service.create(input("second", "")).await.unwrap();
        service
            .update(
                first.id,
                UpdateTodoInput {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let all = service.list(ListQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let open = service
            .list(ListQuery {
                done: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "second");

        let bad_limit = service
            .list(ListQuery {
                limit: Some(0),
                ..Default::default()
            })
            .await;
        assert!(matches!(bad_limit, Err(AppError::ValidationError(_))));
    }
}
