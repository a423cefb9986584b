use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// Collector answer to a delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    /// Accepted.
    Ok,
    /// The collector is overloaded (queue full); the payload was not stored.
    TryLater,
    /// Any code this client does not know, passed through unchanged.
    Unknown(i32),
}

impl ResultCode {
    pub fn from_i32(code: i32) -> Self {
        match code {
            0 => ResultCode::Ok,
            1 => ResultCode::TryLater,
            other => ResultCode::Unknown(other),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            ResultCode::Ok => 0,
            ResultCode::TryLater => 1,
            ResultCode::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Ok => f.write_str("OK"),
            ResultCode::TryLater => f.write_str("TRY_LATER"),
            ResultCode::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

/// One-way delivery of category-tagged payloads over an open connection.
///
/// The client owns exactly one transport and serializes calls to it, so
/// implementations never see two sends in flight at once. Implementations
/// must not retry or reconnect: a broken connection is reported to the
/// caller as an error.
#[async_trait]
pub trait Transport: Send {
    /// Deliver `payload` under the routing `category`.
    ///
    /// **Returns**
    /// - `Ok(code)` with the collector's answer, which may itself be a
    ///   refusal such as [`ResultCode::TryLater`].
    /// - `Err(..)` if the payload could not be delivered or the reply was
    ///   unreadable.
    async fn send(&mut self, category: &str, payload: &str) -> Result<ResultCode>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, category: &str, payload: &str) -> Result<ResultCode> {
        (**self).send(category, payload).await
    }
}
