pub mod errors;
pub mod pbkdf2;

pub use errors::PasswordError;
pub use pbkdf2::Digest;
pub use pbkdf2::PasswordHasher;
pub use pbkdf2::Salt;
pub use pbkdf2::DIGEST_LENGTH;
pub use pbkdf2::ITERATIONS;
pub use pbkdf2::SALT_LENGTH;
