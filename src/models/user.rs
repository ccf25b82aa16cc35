use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::repository::{Entity, Value};

lazy_static! {
    // Display names: no control characters, not only whitespace.
    static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[^\p{Cc}]*[^\p{Cc}\s][^\p{Cc}]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// bcrypt hash; never leaves the service layer.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 1 to 100 characters without control characters.
    #[validate(
        length(min = 1, max = 100),
        regex(path = "NAME_REGEX", message = "Name must contain visible characters")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Must be between 8 and 128 characters long.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(&email),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "password_hash",
        "created_at",
        "updated_at",
    ];
    const UNIQUE_COLUMNS: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Uuid(self.id),
            Value::Text(self.name.clone()),
            Value::Text(self.email.clone()),
            Value::Text(self.password_hash.clone()),
            Value::Timestamp(self.created_at),
            Value::Timestamp(self.updated_at),
        ]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
