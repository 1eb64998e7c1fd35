use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters (only ASCII alphanumeric and underscore allowed)")]
    InvalidCharacters,
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for secret store operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for all account operations
///
/// Every lower-layer failure is converted into one of these before it
/// crosses the service boundary.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Validation errors - caller's fault, fixable by caller
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Registration requires an invite token")]
    InviteRequired,

    // Registration conflict
    #[error("Username already exists: {0}")]
    DuplicateIdentity(String),

    // Authentication rejections - internally distinct for logging,
    // presented identically to the end user
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Session expired or unknown")]
    ExpiredOrUnknown,

    // Throttling
    #[error("Too many attempts")]
    RateLimited,

    // Infrastructure errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Cryptographic failure: {0}")]
    Crypto(String),
}

impl AuthError {
    /// Message safe to show an end user.
    ///
    /// All authentication rejections collapse to one string so a caller
    /// cannot tell unknown users, wrong passwords, forged tokens, and
    /// expired sessions apart. Infrastructure failures collapse to a
    /// generic server error; the detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidUsername(_) | AuthError::InvalidPassword(_) => {
                "Invalid username or password."
            }
            AuthError::InviteRequired => "Registration requires an invite token.",
            AuthError::DuplicateIdentity(_) => {
                "Could not register user because it already exists."
            }
            AuthError::InvalidCredentials
            | AuthError::InvalidSignature
            | AuthError::ExpiredOrUnknown => "Invalid username or password.",
            AuthError::RateLimited => "Please try again later.",
            AuthError::StoreUnavailable(_) | AuthError::Crypto(_) => "Internal server error.",
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        tracing::error!(error = %err, "password hashing failure");
        AuthError::Crypto(err.to_string())
    }
}

impl From<auth::MacError> for AuthError {
    fn from(err: auth::MacError) -> Self {
        tracing::error!(error = %err, "MAC failure");
        AuthError::Crypto(err.to_string())
    }
}
