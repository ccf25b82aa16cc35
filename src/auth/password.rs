//! bcrypt password hashing. The work factor comes from `BCRYPT_COST`.

use bcrypt::{hash, verify};

use crate::error::AppError;

/// Salted bcrypt hash of `password` at work factor `cost`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(password, cost)?)
}

/// `Ok(false)` on a mismatch; `Err` only when `stored_hash` is not a bcrypt hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    Ok(verify(password, stored_hash)?)
}
