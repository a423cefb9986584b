use std::time::Duration;

use crate::env::{env_or, LOGLENS_CATEGORY_ENV, LOGLENS_HOST_ENV, LOGLENS_PORT_ENV};
use crate::error::{LoglensError, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 1463;
pub const DEFAULT_CATEGORY: &str = "loglens";

/// Where and how a client connects to its collector.
///
/// **Fields**
/// - `host`, `port`: collector address.
/// - `category`: routing key attached to every payload sent by the client.
/// - `connect_timeout`: upper bound for opening the connection.
/// - `io_timeout`: upper bound for one request/reply round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub category: String,
    pub connect_timeout: Duration,
    pub io_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            category: DEFAULT_CATEGORY.to_string(),
            connect_timeout: Duration::from_secs(5),
            io_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Defaults overlaid with `LOGLENS_HOST`, `LOGLENS_PORT` and
    /// `LOGLENS_CATEGORY` when set.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let port = env_or(LOGLENS_PORT_ENV, &defaults.port.to_string());
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| LoglensError::validation("port"))?;

        Ok(Self {
            host: env_or(LOGLENS_HOST_ENV, &defaults.host),
            port,
            category: env_or(LOGLENS_CATEGORY_ENV, &defaults.category),
            ..defaults
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// `host:port`, as passed to the socket layer.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
