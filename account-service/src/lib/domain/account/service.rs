use std::sync::Arc;

use async_trait::async_trait;
use auth::mac::HmacSha256;
use auth::mac::MacKey;
use auth::password::Digest;
use auth::password::PasswordHasher;
use auth::password::Salt;
use auth::password::DIGEST_LENGTH;
use auth::password::SALT_LENGTH;
use auth::ratelimit::SlidingWindowLimiter;
use auth::token::Token;
use chrono::Duration;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::errors::StoreError;
use crate::account::models::Credential;
use crate::account::models::LoginCommand;
use crate::account::models::MacKeyId;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;
use crate::account::ports::AccountServicePort;
use crate::account::ports::RedeemOutcome;
use crate::account::ports::SecretStore;
use crate::config::Config;

/// Session lifetime in seconds (7 days). Also the cookie Max-Age.
pub const SESSION_LIFETIME_SECONDS: i64 = 60 * 60 * 24 * 7;

/// Burned on lookups for unknown usernames; keeps login timing flat.
const DUMMY_SALT: Salt = [0u8; SALT_LENGTH];
const DUMMY_DIGEST: Digest = [0u8; DIGEST_LENGTH];

/// Domain service implementation for account operations.
///
/// Composes the password hasher, the two server MAC keys, the secret
/// store, and the login rate limiters into the register / login /
/// validate-session flows.
pub struct AccountService<S>
where
    S: SecretStore,
{
    store: Arc<S>,
    hasher: PasswordHasher,
    session_mac: HmacSha256,
    registration_mac: HmacSha256,
    username_limiter: Arc<SlidingWindowLimiter>,
    address_limiter: Arc<SlidingWindowLimiter>,
    require_invite: bool,
}

impl<S> AccountService<S>
where
    S: SecretStore,
{
    /// Create the service, loading or creating the server MAC keys.
    ///
    /// First boot generates fresh keys and stores them. When a concurrent
    /// bootstrap already inserted a key, the persisted one wins, so every
    /// process instance converges on the same key.
    ///
    /// # Arguments
    /// * `store` - Secret store implementation
    /// * `config` - Invite gating and rate limiter settings
    ///
    /// # Errors
    /// * `StoreUnavailable` - Key load or store failed
    /// * `Crypto` - Key generation failed
    pub async fn with_store(store: Arc<S>, config: &Config) -> Result<Self, AuthError> {
        let session_key = Self::load_or_create_key(&store, MacKeyId::Session).await?;
        let registration_key = Self::load_or_create_key(&store, MacKeyId::Registration).await?;

        Ok(Self {
            store,
            hasher: PasswordHasher::new(),
            session_mac: HmacSha256::new(session_key),
            registration_mac: HmacSha256::new(registration_key),
            username_limiter: Arc::new(SlidingWindowLimiter::new(
                config.limits.username_max_attempts,
                config.limits.username_window_seconds,
            )),
            address_limiter: Arc::new(SlidingWindowLimiter::new(
                config.limits.address_max_attempts,
                config.limits.address_window_seconds,
            )),
            require_invite: config.auth.require_invite,
        })
    }

    async fn load_or_create_key(store: &Arc<S>, id: MacKeyId) -> Result<MacKey, AuthError> {
        if let Some(key) = store.get_mac_key(id).await.map_err(storage_error)? {
            return Ok(key);
        }

        let fresh = HmacSha256::generate_key()?;
        let persisted = store
            .put_mac_key_if_absent(id, fresh)
            .await
            .map_err(storage_error)?;
        if persisted != fresh {
            tracing::info!(key_id = ?id, "concurrent bootstrap won, adopting persisted MAC key");
        }
        Ok(persisted)
    }

    /// Spawn the periodic sweeps that bound rate-limit ledger memory.
    pub fn spawn_rate_limit_sweeps(&self) {
        for limiter in [&self.username_limiter, &self.address_limiter] {
            let limiter = Arc::clone(limiter);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(limiter.cleanup_interval());
                loop {
                    interval.tick().await;
                    limiter.cleanup();
                }
            });
        }
    }

    /// The KDF is deliberately slow; keep it off the async dispatch path.
    async fn derive_digest(&self, password: &Password, salt: Salt) -> Result<Digest, AuthError> {
        let hasher = self.hasher;
        let password = password.as_str().to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password, &salt))
            .await
            .map_err(|e| AuthError::Crypto(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn verify_digest(
        &self,
        password: &Password,
        salt: Salt,
        expected: Digest,
    ) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let password = password.as_str().to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &salt, &expected))
            .await
            .map_err(|e| AuthError::Crypto(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn redeem_invite(&self, invite: &str) -> Result<(), AuthError> {
        let token = Token::parse(invite).map_err(|err| {
            tracing::debug!(error = %err, "malformed invite token");
            AuthError::InvalidSignature
        })?;

        if !token.verify(&self.registration_mac)? {
            tracing::debug!("invite token failed signature check");
            return Err(AuthError::InvalidSignature);
        }

        match self
            .store
            .redeem_invite_token(token.payload())
            .await
            .map_err(storage_error)?
        {
            RedeemOutcome::Redeemed => Ok(()),
            RedeemOutcome::AlreadyUsed | RedeemOutcome::Unknown => {
                tracing::debug!("invite token spent or unknown");
                Err(AuthError::ExpiredOrUnknown)
            }
        }
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: SecretStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<(), AuthError> {
        let username = Username::new(command.username)?;
        let password = Password::new(command.password)?;

        if self.require_invite {
            let invite = command.invite.as_deref().ok_or(AuthError::InviteRequired)?;
            self.redeem_invite(invite).await?;
        }

        let salt = PasswordHasher::generate_salt()?;
        let digest = self.derive_digest(&password, salt).await?;

        let credential = Credential {
            username: username.clone(),
            digest,
            salt,
        };
        self.store
            .register_credential(credential)
            .await
            .map_err(storage_error)?;

        tracing::info!(username = %username, "account registered");
        Ok(())
    }

    async fn login(&self, command: LoginCommand) -> Result<Token, AuthError> {
        if !self.address_limiter.attempt(&command.peer_addr) {
            tracing::warn!(peer_addr = %command.peer_addr, "address rate limit hit");
            return Err(AuthError::RateLimited);
        }

        let username = Username::new(command.username)?;
        let password = Password::new(command.password)?;

        if !self.username_limiter.attempt(username.as_str()) {
            tracing::warn!(username = %username, "username rate limit hit");
            return Err(AuthError::RateLimited);
        }

        let credential = self
            .store
            .get_credential(&username)
            .await
            .map_err(storage_error)?;

        let Some(credential) = credential else {
            // Unknown accounts burn the same KDF cost as a wrong password
            // so the two cases are not observable apart.
            self.verify_digest(&password, DUMMY_SALT, DUMMY_DIGEST)
                .await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_digest(&password, credential.salt, credential.digest)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Token::issue(&self.session_mac)?;
        let expires_at = Utc::now() + Duration::seconds(SESSION_LIFETIME_SECONDS);
        self.store
            .put_session(&username, *token.payload(), expires_at)
            .await
            .map_err(storage_error)?;

        tracing::debug!(username = %username, "session issued");
        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Username, AuthError> {
        let token = match Token::parse(token) {
            Ok(token) => token,
            Err(err) => {
                tracing::debug!(error = %err, "malformed session token");
                return Err(AuthError::InvalidSignature);
            }
        };

        if !token.verify(&self.session_mac)? {
            tracing::debug!("session token failed signature check");
            return Err(AuthError::InvalidSignature);
        }

        let owner = self
            .store
            .get_session_owner(token.payload(), Utc::now())
            .await
            .map_err(storage_error)?;
        owner.ok_or(AuthError::ExpiredOrUnknown)
    }

    async fn issue_invite(&self) -> Result<Token, AuthError> {
        let token = Token::issue(&self.registration_mac)?;
        self.store
            .store_invite_token(*token.payload())
            .await
            .map_err(storage_error)?;

        tracing::info!("registration invite issued");
        Ok(token)
    }
}

fn storage_error(err: StoreError) -> AuthError {
    match err {
        StoreError::DuplicateUsername(username) => AuthError::DuplicateIdentity(username),
        StoreError::Unavailable(detail) => {
            tracing::error!(error = %detail, "secret store unavailable");
            AuthError::StoreUnavailable(detail)
        }
    }
}
