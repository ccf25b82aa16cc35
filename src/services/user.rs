use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{RegisterRequest, User};
use crate::repository::{Query, Repository, Value};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository<User>>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository<User>>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    /// Work factor used for password hashes.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Creates an account. The email is normalised before validation and must not
    /// already be registered.
    pub async fn register(&self, mut request: RegisterRequest) -> Result<User, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        if self.find_by_email(&request.email).await?.is_some() {
            warn!("registration rejected: email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = match self
            .repo
            .create(User::new(request.name, request.email, password_hash))
            .await
        {
            Ok(user) => user,
            // Lost a race with a concurrent registration for the same email.
            Err(AppError::Conflict(_)) => {
                return Err(AppError::Conflict("Email already registered".into()))
            }
            Err(err) => return Err(err),
        };

        info!("registered user {}", user.id);
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = Query::new().filter("email", Value::Text(normalize_email(email)));
        self.repo.find_one(&query).await
    }
}
