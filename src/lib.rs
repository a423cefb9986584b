pub mod error;
pub mod record;
pub mod builder;
pub mod encode;
pub mod transport;
pub mod echo;
pub mod config;
pub mod env;
pub mod client;
pub mod noop_transport;

#[cfg(feature = "scribe")]
pub mod wire;
#[cfg(feature = "scribe")]
pub mod scribe;

pub use client::LoglensClient;
pub use config::ClientConfig;
pub use error::{LoglensError, Result};
pub use record::{LogRecord, LogSource, PreparedRecord};
pub use transport::{ResultCode, Transport};
