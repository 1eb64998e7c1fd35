//! Session cookie formatting for HTTP collaborators.
//!
//! The service itself never speaks HTTP; these helpers pin down the one
//! wire detail that belongs to the auth core, the shape of the session
//! cookie.

use auth::token::Token;

use crate::account::service::SESSION_LIFETIME_SECONDS;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "id";

/// `Set-Cookie` value carrying a freshly issued session token.
pub fn session_cookie(token: &Token) -> String {
    format!(
        "{}={}; Secure; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, SESSION_LIFETIME_SECONDS
    )
}

/// `Set-Cookie` value that discards the session cookie on the client.
pub fn clear_session_cookie() -> String {
    format!("{}=invalid; Max-Age=0", SESSION_COOKIE_NAME)
}

/// Extract the session token text from a `Cookie` request header value.
///
/// Returns None when no `id` cookie is present.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then_some(value)
    })
}
