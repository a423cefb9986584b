use crate::error::Result;
use crate::transport::{ResultCode, Transport};
use async_trait::async_trait;

/// A transport that drops every payload and answers [`ResultCode::Ok`].
///
/// Useful for measuring the overhead of record building and encoding
/// without any network I/O, and for tests that don't care about delivery.
#[derive(Clone, Debug, Default)]
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn send(&mut self, _category: &str, _payload: &str) -> Result<ResultCode> {
        Ok(ResultCode::Ok)
    }
}
