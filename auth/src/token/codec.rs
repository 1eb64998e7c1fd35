use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::mac::HmacSha256;
use crate::mac::MacError;
use crate::mac::MacTag;
use crate::mac::TAG_LENGTH;

use super::errors::TokenError;

/// Random payload length in bytes.
pub const PAYLOAD_LENGTH: usize = 32;

/// Decoded token length: the payload followed by its tag.
const DECODED_LENGTH: usize = PAYLOAD_LENGTH + TAG_LENGTH;

/// Fixed-length unguessable session identifier.
pub type TokenPayload = [u8; PAYLOAD_LENGTH];

/// Signed opaque token.
///
/// An unguessable random payload plus the MAC tag over it. The payload is
/// the durable identifier; the tag lets the server reject forged or
/// tampered tokens without a storage lookup. The text form is standard
/// base64 of `payload || tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    payload: TokenPayload,
    tag: MacTag,
}

impl Token {
    /// Assemble a token from its raw parts.
    ///
    /// # Arguments
    /// * `payload` - Random payload bytes
    /// * `tag` - Tag over the payload
    pub fn from_parts(payload: TokenPayload, tag: MacTag) -> Self {
        Self { payload, tag }
    }

    /// Issue a fresh token: a random payload signed with `mac`.
    ///
    /// # Arguments
    /// * `mac` - Signer holding the server key
    ///
    /// # Returns
    /// Token whose tag verifies under `mac`
    ///
    /// # Errors
    /// * `MacError` - RNG or MAC failure
    pub fn issue(mac: &HmacSha256) -> Result<Self, MacError> {
        let mut payload = [0u8; PAYLOAD_LENGTH];
        OsRng
            .try_fill_bytes(&mut payload)
            .map_err(|e| MacError::RandomFailed(e.to_string()))?;
        let tag = mac.sign(&payload)?;
        Ok(Self { payload, tag })
    }

    /// Check this token's tag under `mac`.
    ///
    /// # Returns
    /// True if the tag authenticates the payload; false for forged or
    /// tampered tokens
    ///
    /// # Errors
    /// * `MacError` - MAC operational failure
    pub fn verify(&self, mac: &HmacSha256) -> Result<bool, MacError> {
        mac.verify(&self.payload, &self.tag)
    }

    /// Parse the canonical base64 text form.
    ///
    /// Oversized input is rejected before any decoding, with a two-byte
    /// margin over the canonical length, so client-supplied lengths never
    /// drive allocation.
    ///
    /// # Arguments
    /// * `input` - Token text as received from the client
    ///
    /// # Errors
    /// * `InvalidLength` - Decoded length differs from payload + tag
    /// * `MalformedEncoding` - Input is not valid base64
    pub fn parse(input: &str) -> Result<Self, TokenError> {
        if input.len() * 3 > (DECODED_LENGTH + 2) * 4 {
            return Err(TokenError::InvalidLength);
        }

        let decoded = STANDARD
            .decode(input)
            .map_err(|_| TokenError::MalformedEncoding)?;
        if decoded.len() != DECODED_LENGTH {
            return Err(TokenError::InvalidLength);
        }

        let mut payload = [0u8; PAYLOAD_LENGTH];
        payload.copy_from_slice(&decoded[..PAYLOAD_LENGTH]);
        let mut tag = [0u8; TAG_LENGTH];
        tag.copy_from_slice(&decoded[PAYLOAD_LENGTH..]);
        Ok(Self { payload, tag })
    }

    /// Payload bytes; the durable identifier stored server-side.
    pub fn payload(&self) -> &TokenPayload {
        &self.payload
    }

    /// Tag bytes.
    pub fn tag(&self) -> &MacTag {
        &self.tag
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = [0u8; DECODED_LENGTH];
        bytes[..PAYLOAD_LENGTH].copy_from_slice(&self.payload);
        bytes[PAYLOAD_LENGTH..].copy_from_slice(&self.tag);
        f.write_str(&STANDARD.encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac::KEY_LENGTH;

    fn test_mac() -> HmacSha256 {
        HmacSha256::new([42u8; KEY_LENGTH])
    }

    #[test]
    fn test_round_trip() {
        let token = Token::issue(&test_mac()).expect("issue failed");

        let parsed = Token::parse(&token.to_string()).expect("parse failed");
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_issued_token_verifies() {
        let mac = test_mac();
        let token = Token::issue(&mac).expect("issue failed");

        assert!(token.verify(&mac).expect("verify failed"));
    }

    #[test]
    fn test_token_signed_by_other_key_fails() {
        let token = Token::issue(&test_mac()).expect("issue failed");

        let other = HmacSha256::new([43u8; KEY_LENGTH]);
        assert!(!token.verify(&other).expect("verify failed"));
    }

    #[test]
    fn test_parse_rejects_invalid_base64() {
        assert_eq!(
            Token::parse("not!valid!base64"),
            Err(TokenError::MalformedEncoding)
        );
    }

    #[test]
    fn test_parse_rejects_short_decoded_length() {
        let short = STANDARD.encode([0u8; DECODED_LENGTH - 1]);
        assert_eq!(Token::parse(&short), Err(TokenError::InvalidLength));
    }

    #[test]
    fn test_parse_rejects_oversized_input_before_decoding() {
        let oversized = "A".repeat(4096);
        assert_eq!(Token::parse(&oversized), Err(TokenError::InvalidLength));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert_eq!(Token::parse(""), Err(TokenError::InvalidLength));
    }

    #[test]
    fn test_issued_payloads_are_distinct() {
        let mac = test_mac();
        let first = Token::issue(&mac).expect("issue failed");
        let second = Token::issue(&mac).expect("issue failed");
        assert_ne!(first.payload(), second.payload());
    }
}
