use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Random generator failure: {0}")]
    RandomFailed(String),
}
