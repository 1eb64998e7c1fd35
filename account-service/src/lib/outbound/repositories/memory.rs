use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::mac::MacKey;
use auth::token::TokenPayload;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::StoreError;
use crate::account::models::Credential;
use crate::account::models::MacKeyId;
use crate::account::models::Username;
use crate::account::ports::RedeemOutcome;
use crate::account::ports::SecretStore;

struct SessionRow {
    username: Username,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    mac_keys: HashMap<MacKeyId, MacKey>,
    credentials: HashMap<String, Credential>,
    sessions: HashMap<TokenPayload, SessionRow>,
    /// Invite payload mapped to whether it has been spent.
    invites: HashMap<TokenPayload, bool>,
}

/// Process-local `SecretStore` for tests and embedded deployments.
///
/// Every method takes the lock exactly once, so the check-then-act
/// contracts of the port (key bootstrap, invite redemption, duplicate
/// usernames) hold without further coordination.
#[derive(Default)]
pub struct InMemorySecretStore {
    inner: RwLock<Inner>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_mac_key(&self, id: MacKeyId) -> Result<Option<MacKey>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.mac_keys.get(&id).copied())
    }

    async fn put_mac_key_if_absent(&self, id: MacKeyId, key: MacKey) -> Result<MacKey, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        Ok(*inner.mac_keys.entry(id).or_insert(key))
    }

    async fn register_credential(&self, credential: Credential) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let username = credential.username.as_str().to_string();
        if inner.credentials.contains_key(&username) {
            return Err(StoreError::DuplicateUsername(username));
        }
        inner.credentials.insert(username, credential);
        Ok(())
    }

    async fn get_credential(&self, username: &Username) -> Result<Option<Credential>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner.credentials.get(username.as_str()).cloned())
    }

    async fn put_session(
        &self,
        username: &Username,
        payload: TokenPayload,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.sessions.insert(
            payload,
            SessionRow {
                username: username.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get_session_owner(
        &self,
        payload: &TokenPayload,
        now: DateTime<Utc>,
    ) -> Result<Option<Username>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .sessions
            .get(payload)
            .filter(|row| row.expires_at > now)
            .map(|row| row.username.clone()))
    }

    async fn store_invite_token(&self, payload: TokenPayload) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.invites.insert(payload, false);
        Ok(())
    }

    async fn redeem_invite_token(
        &self,
        payload: &TokenPayload,
    ) -> Result<RedeemOutcome, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match inner.invites.get_mut(payload) {
            None => Ok(RedeemOutcome::Unknown),
            Some(spent) if *spent => Ok(RedeemOutcome::AlreadyUsed),
            Some(spent) => {
                *spent = true;
                Ok(RedeemOutcome::Redeemed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).expect("invalid test username")
    }

    fn credential(name: &str) -> Credential {
        Credential {
            username: username(name),
            digest: [1u8; auth::password::DIGEST_LENGTH],
            salt: [2u8; auth::password::SALT_LENGTH],
        }
    }

    #[tokio::test]
    async fn test_mac_key_bootstrap_keeps_first_key() {
        let store = InMemorySecretStore::new();
        let first = [1u8; auth::mac::KEY_LENGTH];
        let second = [2u8; auth::mac::KEY_LENGTH];

        let winner = store
            .put_mac_key_if_absent(MacKeyId::Session, first)
            .await
            .unwrap();
        assert_eq!(winner, first);

        // A losing bootstrap gets the already-persisted key back.
        let loser = store
            .put_mac_key_if_absent(MacKeyId::Session, second)
            .await
            .unwrap();
        assert_eq!(loser, first);

        assert_eq!(
            store.get_mac_key(MacKeyId::Session).await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn test_mac_keys_are_separate_per_id() {
        let store = InMemorySecretStore::new();
        let session = [1u8; auth::mac::KEY_LENGTH];

        store
            .put_mac_key_if_absent(MacKeyId::Session, session)
            .await
            .unwrap();
        assert_eq!(store.get_mac_key(MacKeyId::Registration).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_credential_rejects_duplicate() {
        let store = InMemorySecretStore::new();

        store.register_credential(credential("alice")).await.unwrap();
        let result = store.register_credential(credential("alice")).await;
        assert!(matches!(result, Err(StoreError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_get_session_owner_filters_expired_rows() {
        let store = InMemorySecretStore::new();
        let payload = [3u8; auth::token::PAYLOAD_LENGTH];
        let now = Utc::now();

        store
            .put_session(&username("alice"), payload, now + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(
            store.get_session_owner(&payload, now).await.unwrap(),
            Some(username("alice"))
        );
        assert_eq!(
            store
                .get_session_owner(&payload, now + Duration::hours(2))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_invite_redemption_is_single_use() {
        let store = InMemorySecretStore::new();
        let payload = [4u8; auth::token::PAYLOAD_LENGTH];

        store.store_invite_token(payload).await.unwrap();
        assert_eq!(
            store.redeem_invite_token(&payload).await.unwrap(),
            RedeemOutcome::Redeemed
        );
        assert_eq!(
            store.redeem_invite_token(&payload).await.unwrap(),
            RedeemOutcome::AlreadyUsed
        );
    }

    #[tokio::test]
    async fn test_redeem_unknown_invite() {
        let store = InMemorySecretStore::new();

        assert_eq!(
            store
                .redeem_invite_token(&[5u8; auth::token::PAYLOAD_LENGTH])
                .await
                .unwrap(),
            RedeemOutcome::Unknown
        );
    }
}
