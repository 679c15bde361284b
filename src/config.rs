//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

use crate::state_machine::DEFAULT_REPLY_DELAY;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Delay before an assistant reply is delivered
    pub reply_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; unset or empty variables keep
    /// their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind = match get("ARCHABOT_BIND") {
            Some(v) => parse(&v, "ARCHABOT_BIND", "IP address")?,
            None => defaults.bind,
        };
        let port = match get("ARCHABOT_PORT") {
            Some(v) => parse(&v, "ARCHABOT_PORT", "port")?,
            None => defaults.port,
        };
        let reply_delay = match get("ARCHABOT_REPLY_DELAY_MS") {
            Some(v) => Duration::from_millis(parse(&v, "ARCHABOT_REPLY_DELAY_MS", "millisecond count")?),
            None => defaults.reply_delay,
        };

        Ok(Self {
            bind,
            port,
            reply_delay,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse<T: std::str::FromStr>(
    value: &str,
    var: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    })
}
