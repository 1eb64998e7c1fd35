use thiserror::Error;

/// Error type for token parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is not valid base64")]
    MalformedEncoding,

    #[error("Token has the wrong length")]
    InvalidLength,
}
