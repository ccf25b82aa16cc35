use log::{info, warn};
use validator::Validate;

use crate::auth::{
    hash_password, verify_password, JwtKeys, LoginRequest, TokenResponse, DEFAULT_ROLE,
};
use crate::error::AppError;
use crate::models::user::normalize_email;

use super::UserService;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Exchanges email and password for a bearer token.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    keys: JwtKeys,
    /// Checked against when the email is unknown, so both failures cost one bcrypt run.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(users: UserService, keys: JwtKeys) -> Self {
        let dummy_hash = hash_password("not a real password", users.bcrypt_cost())
            .unwrap_or_default();
        Self {
            users,
            keys,
            dummy_hash,
        }
    }

    /// The keys tokens are signed with, also needed by `AuthMiddleware`.
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// An unknown email and a wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, mut request: LoginRequest) -> Result<TokenResponse, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let Some(user) = self.users.find_by_email(&request.email).await? else {
            let _ = verify_password(&request.password, &self.dummy_hash);
            warn!("login failed: unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!("login failed for user {}: wrong password", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let token = self.keys.issue(user.id, &[DEFAULT_ROLE])?;
        info!("user {} logged in", user.id);
        Ok(TokenResponse { token })
    }
}
