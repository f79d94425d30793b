//! Process configuration, read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

pub const SIGNING_KEY_VAR: &str = "SIGNING_KEY";
pub const PORT_VAR: &str = "PORT";
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{SIGNING_KEY_VAR} is not set or empty")]
    MissingSigningKey,

    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Clone)]
pub struct ServerConfig {
    /// HMAC secret for session credentials. Handed to the token codec and
    /// not kept anywhere else.
    pub signing_key: String,
    pub addr: SocketAddr,
}

impl core::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("signing_key", &"<redacted>")
            .field("addr", &self.addr)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_key = lookup(SIGNING_KEY_VAR)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingSigningKey)?;

        let port = match lookup(PORT_VAR).filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: PORT_VAR,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let host = lookup(BIND_ADDR_VAR)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let addr = format!("{}:{}", host.trim(), port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: BIND_ADDR_VAR,
                reason: e.to_string(),
            })?;

        Ok(Self { signing_key, addr })
    }
}
