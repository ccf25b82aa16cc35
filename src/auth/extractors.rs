use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The caller identified by the bearer token.
///
/// Only usable on routes wrapped in `AuthMiddleware`, which verifies the token and
/// stores its [`Claims`] in the request extensions. Missing claims or a subject that
/// is not a UUID produce `AppError::Unauthorized`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl TryFrom<&Claims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".into()))?;
        Ok(Self {
            id,
            roles: claims.roles.clone(),
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.extensions().get::<Claims>() {
            Some(claims) => AuthenticatedUser::try_from(claims),
            None => Err(AppError::Unauthorized(
                "Authentication required".to_string(),
            )),
        };
        ready(result.map_err(ActixError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            exp: usize::MAX,
            iat: 0,
            iss: None,
            roles: vec!["user".to_string()],
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let user_id = Uuid::new_v4();
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(&user_id.to_string()));

        let mut payload = Payload::None;
        let user = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(user.id, user_id);
        assert!(user.has_role("user"));
        assert!(!user.has_role("admin"));
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_without_claims() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_bad_subject() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims("42"));

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
