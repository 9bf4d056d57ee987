//! Password hashing backed by bcrypt.

use super::AuthError;

/// Hash a password with a fresh salt. Two calls with the same password give
/// different hashes that both verify.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored hash. A malformed hash never verifies.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}
