pub mod codec;
pub mod errors;

pub use codec::Token;
pub use codec::TokenPayload;
pub use codec::PAYLOAD_LENGTH;
pub use errors::TokenError;
