//! Argon2 password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::{ApiError, ApiResult};

/// Hash a plaintext password with a fresh random salt.
pub fn hash(plain: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash. A malformed stored
/// hash counts as a mismatch.
pub fn verify(plain: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash("hunter22").unwrap();
        assert!(verify("hunter22", &hashed));
    }

    #[test]
    fn wrong_password_fails() {
        let hashed = hash("hunter22").unwrap();
        assert!(!verify("hunter23", &hashed));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_is_a_mismatch() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
