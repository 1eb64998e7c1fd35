use std::fmt;

use auth::password::Digest;
use auth::password::Salt;

use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;

/// Stored login credential for one account.
///
/// Created at registration, read back at login, never updated. The digest
/// and salt are fixed-length KDF outputs; the plaintext password is never
/// stored.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: Username,
    pub digest: Digest,
    pub salt: Salt,
}

/// Username value type
///
/// Ensures a username is 1-40 characters of ASCII alphanumerics or
/// underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 1;
    const MAX_LENGTH: usize = 40;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username is empty
    /// * `TooLong` - Username longer than 40 characters
    /// * `InvalidCharacters` - Contains characters outside [A-Za-z0-9_]
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Password value type
///
/// Enforces the 8-128 character length policy. Holds the plaintext only as
/// long as a registration or login flow needs it; Debug output is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 128;

    /// Create a new policy-conforming password.
    ///
    /// # Arguments
    /// * `password` - Raw plaintext password
    ///
    /// # Errors
    /// * `TooShort` - Password shorter than 8 characters
    /// * `TooLong` - Password longer than 128 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.len();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    /// Get the plaintext as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Identifies one of the server's persisted MAC keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacKeyId {
    /// Signs session tokens.
    Session,
    /// Signs single-use registration invites.
    Registration,
}

/// Command to register a new account; fields arrive unvalidated from the
/// caller and are re-checked by the service.
pub struct RegisterCommand {
    pub username: String,
    pub password: String,
    pub invite: Option<String>,
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("invite", &self.invite)
            .finish()
    }
}

/// Command to log in; fields arrive unvalidated from the caller.
pub struct LoginCommand {
    pub username: String,
    pub password: String,
    /// Peer network address as reported by the transport; throttled
    /// independently of the username.
    pub peer_addr: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("peer_addr", &self.peer_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_alphanumeric_and_underscore() {
        assert!(Username::new("alice_42".to_string()).is_ok());
        assert!(Username::new("A".to_string()).is_ok());
    }

    #[test]
    fn test_username_rejects_empty() {
        assert_eq!(
            Username::new(String::new()),
            Err(UsernameError::TooShort { min: 1, actual: 0 })
        );
    }

    #[test]
    fn test_username_rejects_overlong() {
        let overlong = "a".repeat(41);
        assert_eq!(
            Username::new(overlong),
            Err(UsernameError::TooLong {
                max: 40,
                actual: 41
            })
        );
    }

    #[test]
    fn test_username_rejects_invalid_characters() {
        for candidate in ["with space", "dash-ed", "dot.ted", "ümlaut"] {
            assert_eq!(
                Username::new(candidate.to_string()),
                Err(UsernameError::InvalidCharacters),
                "{:?} should be rejected",
                candidate
            );
        }
    }

    #[test]
    fn test_password_length_policy() {
        assert!(Password::new("12345678".to_string()).is_ok());
        assert!(Password::new("1234567".to_string()).is_err());
        assert!(Password::new("x".repeat(128)).is_ok());
        assert!(Password::new("x".repeat(129)).is_err());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("super_secret".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("super_secret"));
    }
}
