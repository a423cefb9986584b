use std::time::Duration;

/// Result type used by every send-family operation.
pub type Result<T> = std::result::Result<T, LoglensError>;

/// Errors surfaced by record building, encoding and delivery.
///
/// Nothing is retried or suppressed internally: every failure reaches the
/// caller of the send operation, which decides whether to retry, drop or
/// escalate.
#[derive(thiserror::Error, Debug)]
pub enum LoglensError {
    /// The connection to the collector could not be established.
    #[error("connection to {target} failed: {source}")]
    Connection {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failed on an already open connection.
    #[error("connection lost: {0}")]
    ConnectionLost(#[source] std::io::Error),

    /// The connection broke earlier and is never reopened by the client.
    #[error("connection is closed")]
    Closed,

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The record could not be serialized.
    #[error("failed to encode log record: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The encoded payload would not fit in one frame. Raised before any
    /// network activity.
    #[error("payload too large: {len} bytes exceeds maximum {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// A required field was empty. Raised before any network activity.
    #[error("required field `{field}` is empty")]
    Validation { field: &'static str },

    /// The platform randomness source failed while generating a record id.
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(#[source] rand::Error),

    /// The collector answered with bytes that are not a valid reply.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The collector answered with an application exception.
    #[error("collector raised exception (kind {kind}): {message}")]
    Remote { kind: i32, message: String },
}

impl LoglensError {
    pub(crate) fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Whether this error means the transport is unusable or unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionLost(_) | Self::Closed | Self::Timeout { .. }
        )
    }
}
