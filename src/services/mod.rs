//! Business operations behind the HTTP handlers. Services validate input, call the
//! repositories, log the outcome and return `AppError` for the handlers to map.

pub mod auth;
pub mod task;
pub mod todo;
pub mod user;

pub use auth::AuthService;
pub use task::TaskService;
pub use todo::TodoService;
pub use user::UserService;

use crate::auth::JwtKeys;
use crate::db::Repositories;
use crate::models::ListQuery;
use crate::repository::Query;

/// Every service the application registers, built from one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub todos: TodoService,
    pub tasks: TaskService,
    pub users: UserService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(repositories: Repositories, keys: JwtKeys, bcrypt_cost: u32) -> Self {
        let users = UserService::new(repositories.users, bcrypt_cost);
        Self {
            todos: TodoService::new(repositories.todos),
            tasks: TaskService::new(repositories.tasks),
            auth: AuthService::new(users.clone(), keys),
            users,
        }
    }
}

fn page_query(params: &ListQuery) -> Query {
    let mut query = Query::new();
    if let Some(limit) = params.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.offset(offset);
    }
    query
}
