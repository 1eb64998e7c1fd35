use std::sync::Arc;

use account_service::account::models::LoginCommand;
use account_service::account::models::RegisterCommand;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::repositories::InMemorySecretStore;

/// Peer address used by tests that do not exercise address throttling.
pub const TEST_PEER_ADDR: &str = "203.0.113.7";

/// Service over a fresh in-memory store with default configuration.
pub async fn service() -> (Arc<InMemorySecretStore>, AccountService<InMemorySecretStore>) {
    service_with(Config::default()).await
}

/// Service over a fresh in-memory store with the given configuration.
pub async fn service_with(
    config: Config,
) -> (Arc<InMemorySecretStore>, AccountService<InMemorySecretStore>) {
    let store = Arc::new(InMemorySecretStore::new());
    let service = AccountService::with_store(Arc::clone(&store), &config)
        .await
        .expect("service bootstrap failed");
    (store, service)
}

pub fn register_command(username: &str, password: &str) -> RegisterCommand {
    RegisterCommand {
        username: username.to_string(),
        password: password.to_string(),
        invite: None,
    }
}

pub fn register_command_with_invite(
    username: &str,
    password: &str,
    invite: Option<String>,
) -> RegisterCommand {
    RegisterCommand {
        username: username.to_string(),
        password: password.to_string(),
        invite,
    }
}

pub fn login_command(username: &str, password: &str) -> LoginCommand {
    login_command_from(username, password, TEST_PEER_ADDR)
}

pub fn login_command_from(username: &str, password: &str, peer_addr: &str) -> LoginCommand {
    LoginCommand {
        username: username.to_string(),
        password: password.to_string(),
        peer_addr: peer_addr.to_string(),
    }
}
