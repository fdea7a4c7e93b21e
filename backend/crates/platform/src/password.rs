//! Password Hashing and Verification
//!
//! Password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Constant-time comparison
//! - Character-class policy checks that report every violation at once
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Zeroization prevents memory inspection attacks
//! - Pepper support for additional security layer

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
///
/// Each missing character class is its own variant so callers can report
/// every violation independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// No uppercase letter
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    /// No lowercase letter
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    /// No digit
    #[error("Password must contain at least one number")]
    MissingDigit,

    /// No special character
    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// The full set of policy violations for a candidate password.
///
/// A password can fail several rules at once; all of them are collected
/// so the caller can surface each message separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicyViolations(pub Vec<PasswordPolicyError>);

impl PasswordPolicyViolations {
    /// Violation messages, one per failed rule
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for PasswordPolicyViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for PasswordPolicyViolations {}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Policy
// ============================================================================

/// Check a candidate password against the policy, collecting every violation.
///
/// Rules:
/// - Minimum 8 characters, maximum 128 (Unicode code points, not bytes)
/// - Not empty/whitespace only
/// - No control characters
/// - At least one uppercase letter, lowercase letter, digit,
///   and special (non-alphanumeric) character
///
/// The input is expected to be NFKC-normalized already.
pub fn check_policy(password: &str) -> Vec<PasswordPolicyError> {
    let mut violations = Vec::new();

    if password.trim().is_empty() {
        violations.push(PasswordPolicyError::EmptyOrWhitespace);
        return violations;
    }

    let char_count = password.chars().count();

    if char_count < MIN_PASSWORD_LENGTH {
        violations.push(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }

    if char_count > MAX_PASSWORD_LENGTH {
        violations.push(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: char_count,
        });
    }

    if password
        .chars()
        .any(|ch| ch.is_control() && ch != ' ' && ch != '\t')
    {
        violations.push(PasswordPolicyError::InvalidCharacter);
    }

    if !password.chars().any(|ch| ch.is_uppercase()) {
        violations.push(PasswordPolicyError::MissingUppercase);
    }

    if !password.chars().any(|ch| ch.is_lowercase()) {
        violations.push(PasswordPolicyError::MissingLowercase);
    }

    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        violations.push(PasswordPolicyError::MissingDigit);
    }

    if !password.chars().any(|ch| !ch.is_alphanumeric() && ch != ' ') {
        violations.push(PasswordPolicyError::MissingSpecial);
    }

    violations
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// This type ensures that password data is securely erased from memory
/// when the value is dropped, preventing memory inspection attacks.
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with full policy validation
    ///
    /// Unicode is normalized using NFKC before validation. Every policy
    /// violation is collected and returned together.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyViolations> {
        let normalized: String = raw.nfkc().collect();

        let violations = check_policy(&normalized);
        if !violations.is_empty() {
            return Err(PasswordPolicyViolations(violations));
        }

        Ok(Self(normalized))
    }

    /// Create with only a length/shape check, skipping class requirements
    ///
    /// Used on the login path, where stored credentials may predate the
    /// current policy and the caller collapses any failure into a generic
    /// invalid-credentials result anyway.
    pub fn for_login(raw: String) -> Result<Self, PasswordPolicyViolations> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyViolations(vec![
                PasswordPolicyError::EmptyOrWhitespace,
            ]));
        }

        if normalized.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyViolations(vec![PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: normalized.chars().count(),
            }]));
        }

        Ok(Self(normalized))
    }

    /// Create without validation (for testing or trusted input)
    ///
    /// ## Safety
    /// Only use this for testing or when password has already been validated
    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    /// Get the password as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret for additional security
    ///
    /// ## Returns
    /// PHC-formatted hash string wrapped in `HashedPassword`
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        // Combine password with pepper if provided
        let password_bytes = match pepper {
            Some(p) => {
                let mut combined = self.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => self.as_bytes().to_vec(),
        };

        // Generate random salt (128 bits = 16 bytes)
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters:
        // m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// This type stores the Argon2id hash in PHC format, which includes:
/// - Algorithm identifier
/// - Version
/// - Parameters (memory, iterations, parallelism)
/// - Salt
/// - Hash
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        // Validate it's a valid PHC string
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Uses constant-time comparison to prevent timing attacks.
    ///
    /// ## Arguments
    /// * `password` - The clear text password to verify
    /// * `pepper` - Optional pepper (must match the one used during hashing)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let password_bytes = match pepper {
            Some(p) => {
                let mut combined = password.as_bytes().to_vec();
                combined.extend_from_slice(p);
                combined
            }
            None => password.as_bytes().to_vec(),
        };

        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let argon2 = Argon2::default();

        // Argon2 uses constant-time comparison internally
        argon2
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }

    /// Check if the hash needs to be rehashed (e.g., parameters changed)
    ///
    /// Returns true if the hash uses outdated parameters
    pub fn needs_rehash(&self) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return true,
        };

        // Check if algorithm is Argon2id
        if parsed_hash.algorithm != argon2::Algorithm::Argon2id.ident() {
            return true;
        }

        false
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
