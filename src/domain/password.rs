//! Password policy and hashing primitive.
//!
//! The policy check is pure and cheap; hashing is deliberately expensive
//! (tunable Argon2id work factor) and always runs on the blocking thread
//! pool so async workers keep serving unrelated requests.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Password policy violations.
///
/// An empty password and a too-short password are kept distinguishable
/// so callers can surface different messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,

    #[error("Password must be at least {0} characters")]
    TooShort(usize),
}

/// Validate a plaintext password against the minimum-length policy.
///
/// Must be called before any hashing attempt; a rejected password is
/// never handed to the hasher.
pub fn validate_password(plain_text: &str) -> Result<(), PasswordPolicyError> {
    if plain_text.is_empty() {
        return Err(PasswordPolicyError::Empty);
    }
    if plain_text.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Password hashing primitive for dependency injection.
///
/// Output is salted: hashing the same plaintext twice yields different
/// strings, both of which verify.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque hash string
    async fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Verify a plaintext password against a stored hash
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2id implementation of the hashing primitive.
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Create a hasher with an explicit work factor.
    ///
    /// # Errors
    /// Returns an error if the parameters are outside Argon2's valid range.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::internal(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Create a hasher with the work factor from application config.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, plain_text: &str) -> AppResult<String> {
        // Argon2 is CPU- and memory-bound; keep it off the async workers.
        let argon2 = self.argon2.clone();
        let plain_text = plain_text.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(plain_text.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                self.argon2
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small work factor to keep tests fast
    fn test_hasher() -> Argon2Hasher {
        Argon2Hasher::new(1024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = test_hasher();
        let plain = "SecurePassword123!";
        let hash = hasher.hash(plain).await.unwrap();

        assert_ne!(hash, plain);
        assert!(hasher.verify(plain, &hash));
        assert!(!hasher.verify("WrongPassword123", &hash));
    }

    #[tokio::test]
    async fn test_same_password_different_salts() {
        let hasher = test_hasher();
        let plain = "SamePassword123";
        let hash1 = hasher.hash(plain).await.unwrap();
        let hash2 = hasher.hash(plain).await.unwrap();

        // Different salts produce different hashes
        assert_ne!(hash1, hash2);
        // But both verify correctly
        assert!(hasher.verify(plain, &hash1));
        assert!(hasher.verify(plain, &hash2));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = test_hasher();
        assert!(!hasher.verify("whatever", "not-a-phc-string"));
    }

    #[test]
    fn test_password_empty() {
        assert_eq!(validate_password(""), Err(PasswordPolicyError::Empty));
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("short"),
            Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH))
        );
    }

    #[test]
    fn test_password_minimum_length() {
        // Exactly 8 characters should pass
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_invalid_work_factor_rejected() {
        assert!(Argon2Hasher::new(0, 0, 0).is_err());
    }
}
