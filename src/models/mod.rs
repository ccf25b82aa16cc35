pub mod task;
pub mod todo;
pub mod user;

use serde::Deserialize;
use validator::Validate;

pub use task::{CreateTaskInput, Task, UpdateTaskInput};
pub use todo::{CreateTodoInput, Todo, UpdateTodoInput};
pub use user::{RegisterRequest, User, UserResponse};

/// Query parameters accepted by the list endpoints.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListQuery {
    /// Only return records with this completion state.
    pub done: Option<bool>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}
