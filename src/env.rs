//! Environment variable names read by [`ClientConfig::from_env`].
//!
//! These are purely helpers; the client itself never touches the
//! environment.
//!
//! [`ClientConfig::from_env`]: crate::config::ClientConfig::from_env

/// Collector host name or address, e.g. `scribe.internal`.
pub const LOGLENS_HOST_ENV: &str = "LOGLENS_HOST";

/// Collector TCP port.
pub const LOGLENS_PORT_ENV: &str = "LOGLENS_PORT";

/// Routing category attached to every payload.
pub const LOGLENS_CATEGORY_ENV: &str = "LOGLENS_CATEGORY";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
