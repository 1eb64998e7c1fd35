use hmac::Hmac;
use hmac::Mac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::errors::MacError;

/// MAC key length in bytes.
pub const KEY_LENGTH: usize = 64;

/// Authentication tag length in bytes (SHA-256 output).
pub const TAG_LENGTH: usize = 32;

/// Fixed-length secret key material for the MAC.
pub type MacKey = [u8; KEY_LENGTH];

/// Fixed-length authentication tag.
pub type MacTag = [u8; TAG_LENGTH];

type HmacSha256Impl = Hmac<Sha256>;

/// Keyed HMAC-SHA256 signer and verifier.
///
/// Constructed once with a secret key, then signs and verifies opaque byte
/// strings. A failed verification is an expected outcome (`Ok(false)`), not
/// an error; `Err` is reserved for operational failures.
pub struct HmacSha256 {
    key: MacKey,
}

impl HmacSha256 {
    /// Create a new signer over the given key.
    ///
    /// # Arguments
    /// * `key` - Fixed-length secret key (should be stored securely)
    pub fn new(key: MacKey) -> Self {
        Self { key }
    }

    /// Generate a fresh random key from the operating system RNG.
    ///
    /// # Returns
    /// Fixed-length key suitable for `new`
    ///
    /// # Errors
    /// * `RandomFailed` - The OS RNG could not produce bytes
    pub fn generate_key() -> Result<MacKey, MacError> {
        let mut key = [0u8; KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| MacError::RandomFailed(e.to_string()))?;
        Ok(key)
    }

    fn keyed(&self) -> Result<HmacSha256Impl, MacError> {
        HmacSha256Impl::new_from_slice(&self.key).map_err(|e| MacError::KeyRejected(e.to_string()))
    }

    /// Compute the authentication tag over a message.
    ///
    /// # Arguments
    /// * `data` - Message bytes to authenticate
    ///
    /// # Returns
    /// 32-byte authentication tag
    ///
    /// # Errors
    /// * `KeyRejected` - The MAC implementation rejected the key
    pub fn sign(&self, data: &[u8]) -> Result<MacTag, MacError> {
        let mut mac = self.keyed()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().into())
    }

    /// Check a tag against a message.
    ///
    /// Comparison is constant-time inside the MAC implementation.
    ///
    /// # Arguments
    /// * `data` - Message bytes
    /// * `tag` - Tag to check
    ///
    /// # Returns
    /// True if the tag authenticates the message under this key
    ///
    /// # Errors
    /// * `KeyRejected` - The MAC implementation rejected the key
    pub fn verify(&self, data: &[u8], tag: &MacTag) -> Result<bool, MacError> {
        let mut mac = self.keyed()?;
        mac.update(data);
        Ok(mac.verify_slice(tag).is_ok())
    }
}
