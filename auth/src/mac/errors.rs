use thiserror::Error;

/// Error type for keyed-MAC operations.
///
/// A tag that fails to verify is not an error; these variants cover
/// operational failures only.
#[derive(Debug, Clone, Error)]
pub enum MacError {
    #[error("MAC key rejected: {0}")]
    KeyRejected(String),

    #[error("Random generator failure: {0}")]
    RandomFailed(String),
}
