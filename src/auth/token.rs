use crate::config::{JwtConfig, JwtSigning};
use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token, the user's UUID.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Signing and verification keys, built once from configuration and shared with
/// the auth middleware through application data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    expiration: chrono::Duration,
    issuer: Option<String>,
}

/// Lifetimes chrono cannot represent saturate, so `issue` fails instead of panicking.
fn lifetime(hours: i64) -> chrono::Duration {
    chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::MAX)
}

impl JwtKeys {
    /// HS256 keys from a shared secret.
    pub fn from_secret(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: lifetime(expiration_hours),
            issuer: None,
        }
    }

    /// RS256 keys from PEM-encoded RSA key material.
    pub fn from_rsa_pem(
        private_pem: &[u8],
        public_pem: &[u8],
        expiration_hours: i64,
    ) -> Result<Self, AppError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AppError::InternalServerError(format!("Invalid private key: {}", e)))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AppError::InternalServerError(format!("Invalid public key: {}", e)))?;
        Ok(Self {
            encoding,
            decoding,
            algorithm: Algorithm::RS256,
            expiration: lifetime(expiration_hours),
            issuer: None,
        })
    }

    pub fn from_config(config: &JwtConfig) -> Result<Self, AppError> {
        let keys = match &config.signing {
            JwtSigning::Secret(secret) => {
                Self::from_secret(secret.as_bytes(), config.expiration_hours)
            }
            JwtSigning::KeyPair {
                private_key,
                public_key,
            } => {
                let read = |path: &std::path::Path| {
                    std::fs::read(path).map_err(|e| {
                        AppError::InternalServerError(format!(
                            "Failed to read key {}: {}",
                            path.display(),
                            e
                        ))
                    })
                };
                Self::from_rsa_pem(
                    &read(private_key.as_path())?,
                    &read(public_key.as_path())?,
                    config.expiration_hours,
                )?
            }
        };
        Ok(keys.with_issuer(config.issuer.clone()))
    }

    /// When set, the issuer is written into new tokens and required on incoming ones.
    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    /// Issues a signed token for `user_id`.
    pub fn issue(&self, user_id: Uuid, roles: &[&str]) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(self.expiration)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: self.issuer.clone(),
            roles: roles.iter().map(|role| role.to_string()).collect(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature, expiry and (if configured) issuer.
    /// Any failure is `AppError::Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(self.algorithm);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
