use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub auth: AuthConfig,
    pub limits: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Gate registration behind server-issued single-use invites.
    pub require_invite: bool,
}

/// Login throttling settings.
///
/// Defaults: 5 attempts per 15 minutes per peer address, 10 attempts per
/// 30 minutes per username. The address window is the tighter one to blunt
/// distributed guessing from a single source.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub address_max_attempts: usize,
    pub address_window_seconds: i64,
    pub username_max_attempts: usize,
    pub username_window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            address_max_attempts: 5,
            address_window_seconds: 15 * 60,
            username_max_attempts: 10,
            username_window_seconds: 30 * 60,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__REQUIRE_INVITE, LIMITS__ADDRESS_MAX_ATTEMPTS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: AUTH__REQUIRE_INVITE=true overrides auth.require_invite
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_limits() {
        let config = Config::default();

        assert!(!config.auth.require_invite);
        assert_eq!(config.limits.address_max_attempts, 5);
        assert_eq!(config.limits.address_window_seconds, 900);
        assert_eq!(config.limits.username_max_attempts, 10);
        assert_eq!(config.limits.username_window_seconds, 1800);
    }
}
