//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (PBKDF2-HMAC-SHA512, constant-time verification)
//! - Keyed signing and verification of opaque tokens (HMAC-SHA256)
//! - Session token encoding and decoding
//! - Sliding-window rate limiting
//!
//! Each service defines its own storage and orchestration around these
//! implementations. This avoids coupling services through shared domain
//! logic while reducing code duplication.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = PasswordHasher::generate_salt().unwrap();
//! let digest = hasher.hash("my_password", &salt).unwrap();
//! assert!(hasher.verify("my_password", &salt, &digest).unwrap());
//! ```
//!
//! ## Signed Tokens
//! ```
//! use auth::{HmacSha256, Token};
//!
//! let key = HmacSha256::generate_key().unwrap();
//! let mac = HmacSha256::new(key);
//!
//! let token = Token::issue(&mac).unwrap();
//! let text = token.to_string();
//!
//! let parsed = Token::parse(&text).unwrap();
//! assert!(parsed.verify(&mac).unwrap());
//! ```
//!
//! ## Rate Limiting
//! ```
//! use auth::SlidingWindowLimiter;
//!
//! let limiter = SlidingWindowLimiter::new(3, 60);
//! assert!(limiter.attempt("alice"));
//! ```

pub mod mac;
pub mod password;
pub mod ratelimit;
pub mod token;

// Re-export commonly used items
pub use mac::HmacSha256;
pub use mac::MacError;
pub use mac::MacKey;
pub use mac::MacTag;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use ratelimit::SlidingWindowLimiter;
pub use token::Token;
pub use token::TokenError;
