//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! `ROVER_AUTH_DOMAIN` and `ROVER_CLIENT_ID` override the `[provider]`
//! table so the same file can be promoted between stage and production.

use rover_auth::ProviderConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderSection,
}

/// Inbound HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// Rover identity provider coordinates
#[derive(Debug, Deserialize)]
pub struct ProviderSection {
    #[serde(default)]
    pub auth_domain: String,
    /// Registered client identifier, kept as a string even when numeric
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

fn default_max_connections() -> usize {
    1000
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(domain) = std::env::var("ROVER_AUTH_DOMAIN") {
            config.provider.auth_domain = non_empty_env("ROVER_AUTH_DOMAIN", domain)?;
        }
        if let Ok(client_id) = std::env::var("ROVER_CLIENT_ID") {
            config.provider.client_id = non_empty_env("ROVER_CLIENT_ID", client_id)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        let domain = &self.provider.auth_domain;
        if !domain.starts_with("http://") && !domain.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "auth_domain must start with http:// or https://, got: {domain:?}"
            )));
        }

        if self.provider.client_id.trim().is_empty() {
            return Err(common::Error::Config(
                "client_id must be set in [provider] or via ROVER_CLIENT_ID".into(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Provider coordinates handed to the exchange client.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::new(&self.provider.auth_domain, &self.provider.client_id)
            .with_timeout(Duration::from_secs(self.provider.timeout_secs))
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("rover-auth-gateway.toml")
    }
}

fn non_empty_env(var: &'static str, value: String) -> common::Result<String> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(common::Error::Env {
            var,
            reason: "set but empty".into(),
        });
    }
    Ok(value)
}
