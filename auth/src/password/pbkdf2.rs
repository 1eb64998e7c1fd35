use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Derived digest length in bytes.
pub const DIGEST_LENGTH: usize = 16;

/// PBKDF2 iteration count. Deliberately expensive so offline brute force
/// stays costly; lowering it weakens every stored credential.
pub const ITERATIONS: u32 = 210_000;

/// Fixed-length random salt stored next to each credential.
pub type Salt = [u8; SALT_LENGTH];

/// Fixed-length password verifier produced by the KDF.
pub type Digest = [u8; DIGEST_LENGTH];

/// Password hashing implementation.
///
/// PBKDF2-HMAC-SHA512 with a per-credential random salt. Deterministic for
/// identical inputs, so verification recomputes the digest and compares it
/// in constant time.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    /// Create a new password hasher with the standard iteration count.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self {
            iterations: ITERATIONS,
        }
    }

    /// Generate a fresh random salt from the operating system RNG.
    ///
    /// # Returns
    /// Fixed-length salt suitable for `hash`
    ///
    /// # Errors
    /// * `RandomFailed` - The OS RNG could not produce bytes
    pub fn generate_salt() -> Result<Salt, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomFailed(e.to_string()))?;
        Ok(salt)
    }

    /// Derive the fixed-length digest for a password and salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Per-credential random salt
    ///
    /// # Returns
    /// 16-byte password verifier
    ///
    /// # Errors
    /// * `DerivationFailed` - The underlying KDF rejected its inputs; this
    ///   indicates misconfiguration, never a wrong password
    pub fn hash(&self, password: &str, salt: &Salt) -> Result<Digest, PasswordError> {
        let mut digest = [0u8; DIGEST_LENGTH];
        pbkdf2::<Hmac<Sha512>>(password.as_bytes(), salt, self.iterations, &mut digest)
            .map_err(|e| PasswordError::DerivationFailed(e.to_string()))?;
        Ok(digest)
    }

    /// Verify a password against a stored digest.
    ///
    /// Recomputes the full derivation and compares with a constant-time
    /// byte comparison; no early exit on the first differing byte.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `salt` - Salt stored with the credential
    /// * `expected` - Digest stored with the credential
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `DerivationFailed` - The underlying KDF failed
    pub fn verify(
        &self,
        password: &str,
        salt: &Salt,
        expected: &Digest,
    ) -> Result<bool, PasswordError> {
        let digest = self.hash(password, salt)?;
        Ok(bool::from(digest.ct_eq(expected)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
