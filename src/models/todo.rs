use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::repository::{Entity, Value};

/// A todo item as stored in the `todos` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/todos`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTodoInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Payload for `PATCH /api/todos/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTodoInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl Todo {
    /// New todos start out not done, with both timestamps set to now.
    pub fn new(input: CreateTodoInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            done: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: UpdateTodoInput) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
    }
}

impl Entity for Todo {
    const TABLE: &'static str = "todos";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "done",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Uuid(self.id),
            Value::Text(self.title.clone()),
            Value::Text(self.description.clone()),
            Value::Bool(self.done),
            Value::Timestamp(self.created_at),
            Value::Timestamp(self.updated_at),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> CreateTodoInput {
        CreateTodoInput {
            title: title.to_string(),
            description: "Pick up milk".to_string(),
        }
    }

    #[test]
    fn test_todo_creation_defaults() {
        let todo = Todo::new(input("Groceries"));
        assert_eq!(todo.title, "Groceries");
        assert_eq!(todo.description, "Pick up milk");
        assert!(!todo.done);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn test_create_input_validation() {
        assert!(input("Groceries").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let long_description = CreateTodoInput {
            title: "Groceries".to_string(),
            description: "b".repeat(1001),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let parsed: CreateTodoInput = serde_json::from_str(r#"{"title":"Groceries"}"#).unwrap();
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut todo = Todo::new(input("Groceries"));
        todo.apply(UpdateTodoInput {
            done: Some(true),
            ..Default::default()
        });
        assert!(todo.done);
        assert_eq!(todo.title, "Groceries");
        assert_eq!(todo.description, "Pick up milk");

        todo.apply(UpdateTodoInput {
            done: Some(false),
            ..Default::default()
        });
        assert!(!todo.done);
    }

    #[test]
    fn test_update_input_distinguishes_unset_from_false() {
        let unset: UpdateTodoInput = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(unset.done, None);

        let explicit: UpdateTodoInput = serde_json::from_str(r#"{"done":false}"#).unwrap();
        assert_eq!(explicit.done, Some(false));

        let empty_title = UpdateTodoInput {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_values_follow_column_order() {
        let todo = Todo::new(input("Groceries"));
        let values = todo.values();
        assert_eq!(values.len(), Todo::COLUMNS.len());
        assert_eq!(values[0], Value::Uuid(todo.id));
        assert_eq!(values[3], Value::Bool(false));
    }
}
