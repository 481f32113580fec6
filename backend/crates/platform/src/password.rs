//! Password Hashing and Verification
//!
//! - Argon2id hashing with a fresh random salt per call
//! - Zeroization of plaintext on drop
//! - Constant-time comparison (inside argon2)
//!
//! The stored form is a PHC string, which carries the algorithm, version,
//! parameters and salt alongside the digest, so verification needs nothing
//! but the string itself.

use std::fmt;

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash as PhcHash, SaltString},
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum accepted password length (in characters, after normalization)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password input rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is empty or contains only whitespace
    #[error("password is required")]
    EmptyOrWhitespace,

    /// Password is too long
    #[error("password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains control characters
    #[error("password contains invalid control characters")]
    InvalidCharacter,
}

/// Hashing/verification failures
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a valid PHC string
    #[error("invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Raw Password (Zeroized on drop)
// ============================================================================

/// Plaintext password with automatic memory zeroization.
///
/// Does not implement `Clone`; `Debug` output is redacted. The value is
/// NFKC-normalized on construction so visually identical inputs verify
/// identically.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawPassword(String);

impl RawPassword {
    /// Validate and normalize a plaintext password.
    ///
    /// Rejects empty/whitespace-only input, input longer than
    /// [`MAX_PASSWORD_LENGTH`] characters, and control characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.into().nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized.chars().any(|ch| ch.is_control()) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with Argon2id and a fresh random salt.
    ///
    /// Two calls on the same plaintext yield different PHC strings, and
    /// both verify.
    pub fn hash(&self) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(PasswordHash {
            phc: hash.to_string(),
        })
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Password Hash (safe to store)
// ============================================================================

/// Argon2id digest in PHC string format. Safe to persist and to log-redact.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    phc: String,
}

impl PasswordHash {
    /// Restore from a stored PHC string, validating its shape.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = s.into();

        PhcHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { phc })
    }

    /// The PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Verify a plaintext against this hash.
    ///
    /// Argon2 recomputes the digest with the stored salt and parameters and
    /// compares in constant time; an unparsable stored hash verifies false.
    pub fn verify(&self, password: &RawPassword) -> bool {
        let parsed = match PhcHash::new(&self.phc) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("phc", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_empty() {
        let result = RawPassword::new("");
        assert!(matches!(result, Err(PasswordPolicyError::EmptyOrWhitespace)));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = RawPassword::new("        ");
        assert!(matches!(result, Err(PasswordPolicyError::EmptyOrWhitespace)));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let result = RawPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_control_characters() {
        let result = RawPassword::new("pass\u{0000}word");
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_short_password_accepted() {
        // The policy is "non-empty", not a minimum length
        assert!(RawPassword::new("Secr3t!").is_ok());
    }

    #[test]
    fn test_unicode_password_accepted() {
        assert!(RawPassword::new("contraseña-segura").is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = RawPassword::new("Secr3t!").unwrap();
        let hashed = password.hash().unwrap();

        assert!(hashed.verify(&password));

        let wrong = RawPassword::new("wrong").unwrap();
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_hash_is_salted() {
        let password = RawPassword::new("Secr3t!").unwrap();
        let first = password.hash().unwrap();
        let second = password.hash().unwrap();

        // Fresh salt per call: stored bytes differ, both verify
        assert_ne!(first.as_phc_string(), second.as_phc_string());
        assert!(first.verify(&password));
        assert!(second.verify(&password));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = RawPassword::new("Secr3t!").unwrap();
        let hashed = password.hash().unwrap();

        let restored = PasswordHash::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password));
    }

    #[test]
    fn test_invalid_phc_string() {
        let result = PasswordHash::from_phc_string("not_a_valid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = RawPassword::new("super-secret").unwrap();
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("super-secret"));

        let hashed = password.hash().unwrap();
        let debug_output = format!("{:?}", hashed);
        assert!(!debug_output.contains(hashed.as_phc_string()));
    }
}
