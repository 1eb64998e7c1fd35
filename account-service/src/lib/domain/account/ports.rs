use async_trait::async_trait;
use auth::mac::MacKey;
use auth::token::Token;
use auth::token::TokenPayload;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::errors::StoreError;
use crate::account::models::Credential;
use crate::account::models::LoginCommand;
use crate::account::models::MacKeyId;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;

/// Outcome of redeeming a single-use registration invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// The invite existed, was unspent, and is now marked used.
    Redeemed,
    /// The invite was spent earlier.
    AlreadyUsed,
    /// No such invite was ever issued.
    Unknown,
}

/// Port for account domain service operations.
///
/// The narrow interface HTTP handlers and other collaborators call into.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Raw username, password, and optional invite token
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidPassword` - Input fails policy
    /// * `InviteRequired` / `InvalidSignature` / `ExpiredOrUnknown` -
    ///   Invite gating rejected the request
    /// * `DuplicateIdentity` - Username is already taken
    /// * `StoreUnavailable` / `Crypto` - Infrastructure failure
    async fn register(&self, command: RegisterCommand) -> Result<(), AuthError>;

    /// Authenticate a username and password, creating a session.
    ///
    /// # Arguments
    /// * `command` - Raw username, password, and peer address
    ///
    /// # Returns
    /// Signed session token for transport to the client
    ///
    /// # Errors
    /// * `RateLimited` - Attempt budget for the address or username is spent
    /// * `InvalidCredentials` - Unknown username or wrong password,
    ///   deliberately indistinguishable
    /// * `StoreUnavailable` / `Crypto` - Infrastructure failure
    async fn login(&self, command: LoginCommand) -> Result<Token, AuthError>;

    /// Resolve a session token to the account that owns it.
    ///
    /// # Arguments
    /// * `token` - Token text as received from the client
    ///
    /// # Returns
    /// Username of the session owner
    ///
    /// # Errors
    /// * `InvalidSignature` - Malformed, forged, or tampered token
    /// * `ExpiredOrUnknown` - Tag verified but no live session exists
    /// * `StoreUnavailable` - Infrastructure failure
    async fn validate_session(&self, token: &str) -> Result<Username, AuthError>;

    /// Issue a single-use registration invite signed by the server.
    ///
    /// # Returns
    /// Signed invite token to hand to the invited party
    ///
    /// # Errors
    /// * `StoreUnavailable` / `Crypto` - Infrastructure failure
    async fn issue_invite(&self) -> Result<Token, AuthError>;
}

/// Persistence boundary for MAC keys, credentials, sessions, and invites.
///
/// Implementations must uphold the atomicity notes on each method; the
/// service relies on them to stay race-free without locking of its own.
#[async_trait]
pub trait SecretStore: Send + Sync + 'static {
    /// Fetch a persisted MAC key.
    ///
    /// # Returns
    /// The key, or None if none was stored yet
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn get_mac_key(&self, id: MacKeyId) -> Result<Option<MacKey>, StoreError>;

    /// Store `key` under `id` unless a key is already present, atomically.
    ///
    /// # Returns
    /// The key persisted under `id` after this call: the caller's on first
    /// boot, the previously stored one when a concurrent bootstrap won the
    /// race
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn put_mac_key_if_absent(&self, id: MacKeyId, key: MacKey) -> Result<MacKey, StoreError>;

    /// Persist a new credential record; never overwrites.
    ///
    /// # Errors
    /// * `DuplicateUsername` - A credential for this username exists
    /// * `Unavailable` - Persistence failure
    async fn register_credential(&self, credential: Credential) -> Result<(), StoreError>;

    /// Fetch the credential record for a username.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn get_credential(&self, username: &Username) -> Result<Option<Credential>, StoreError>;

    /// Persist a session: `payload` resolves to `username` until
    /// `expires_at`.
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn put_session(
        &self,
        username: &Username,
        payload: TokenPayload,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Resolve the owner of a session payload.
    ///
    /// Must filter by `expires_at > now`; an expired session reads as
    /// absent.
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn get_session_owner(
        &self,
        payload: &TokenPayload,
        now: DateTime<Utc>,
    ) -> Result<Option<Username>, StoreError>;

    /// Record a freshly issued, unspent invite payload.
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn store_invite_token(&self, payload: TokenPayload) -> Result<(), StoreError>;

    /// Atomically check an invite and mark it spent, so concurrent
    /// redemption cannot double-spend.
    ///
    /// # Errors
    /// * `Unavailable` - Persistence failure
    async fn redeem_invite_token(&self, payload: &TokenPayload)
        -> Result<RedeemOutcome, StoreError>;
}
