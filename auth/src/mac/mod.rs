pub mod errors;
pub mod hmac;

pub use errors::MacError;
pub use hmac::HmacSha256;
pub use hmac::MacKey;
pub use hmac::MacTag;
pub use hmac::KEY_LENGTH;
pub use hmac::TAG_LENGTH;
