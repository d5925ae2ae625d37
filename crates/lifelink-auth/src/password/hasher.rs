//! Argon2id password hashing, verification, and the password policy.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use lifelink_core::error::AppError;

/// Hashes and verifies passwords with Argon2id, enforcing the configured
/// minimum password length before any hashing work happens.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    min_length: usize,
}

impl PasswordHasher {
    /// Creates a hasher with the given minimum password length.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    ///
    /// Passwords shorter than the configured minimum are rejected with a
    /// validation error.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifelink_core::error::ErrorKind;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(6);
        let hash = hasher.hash_password("correct horse").unwrap();
        assert!(hasher.verify_password("correct horse", &hash).unwrap());
        assert!(!hasher.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_short_password_is_rejected() {
        let hasher = PasswordHasher::new(8);
        let err = hasher.hash_password("short").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_invalid_hash_is_an_error() {
        let hasher = PasswordHasher::new(6);
        assert!(hasher.verify_password("pw", "not-a-phc-string").is_err());
    }
}
