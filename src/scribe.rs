use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ClientConfig;
use crate::error::{LoglensError, Result};
use crate::wire::{self, LogEntry, Reply, MAX_FRAME_SIZE};
use crate::transport::{ResultCode, Transport};

/// [`Transport`] speaking Scribe over a Thrift framed transport with the
/// binary protocol.
///
/// The connection is opened once by [`ScribeTransport::connect`]. Any I/O
/// failure or timeout afterwards leaves the stream in an unknown state, so
/// the transport closes it and every later send fails with
/// [`LoglensError::Closed`]. Reconnecting is up to whoever built the client.
#[derive(Debug)]
pub struct ScribeTransport {
    stream: Option<TcpStream>,
    target: String,
    io_timeout: Duration,
    seq_id: i32,
}

impl ScribeTransport {
    /// Open a connection to `config.host:config.port`.
    ///
    /// **Returns**
    /// - `Err(LoglensError::Connection { .. })` if the socket could not be
    ///   opened.
    /// - `Err(LoglensError::Timeout { .. })` if opening took longer than
    ///   `config.connect_timeout`.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let target = config.target();
        let stream = match timeout(config.connect_timeout, TcpStream::connect(&target)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(LoglensError::Connection { target, source }),
            Err(_) => {
                return Err(LoglensError::Timeout {
                    operation: "connect",
                    after: config.connect_timeout,
                })
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(addr = %target, error = %e, "failed to set TCP_NODELAY");
        }
        tracing::info!(addr = %target, "connected to scribe collector");

        Ok(Self {
            stream: Some(stream),
            target,
            io_timeout: config.io_timeout,
            seq_id: 0,
        })
    }

    /// `host:port` this transport was opened against.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn next_seq_id(&mut self) -> i32 {
        self.seq_id = self.seq_id.wrapping_add(1);
        self.seq_id
    }
}

async fn round_trip(stream: &mut TcpStream, frame: &[u8]) -> Result<Vec<u8>> {
    stream
        .write_all(frame)
        .await
        .map_err(LoglensError::ConnectionLost)?;
    stream.flush().await.map_err(LoglensError::ConnectionLost)?;

    let mut len = [0u8; 4];
    stream
        .read_exact(&mut len)
        .await
        .map_err(LoglensError::ConnectionLost)?;
    let len = u32::from_be_bytes(len) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(LoglensError::protocol(format!(
            "reply frame of {len} bytes exceeds maximum {MAX_FRAME_SIZE}"
        )));
    }

    let mut body = vec![0u8; len];
    stream
        .read_exact(&mut body)
        .await
        .map_err(LoglensError::ConnectionLost)?;
    Ok(body)
}

#[async_trait]
impl Transport for ScribeTransport {
    async fn send(&mut self, category: &str, payload: &str) -> Result<ResultCode> {
        let seq_id = self.next_seq_id();
        let io_timeout = self.io_timeout;
        let frame = wire::encode_log_call(
            seq_id,
            &[LogEntry {
                category,
                message: payload,
            }],
        )?;

        // Out of `self` while a call is in flight: if this future is dropped
        // mid-call the stream goes with it and later sends see `Closed`.
        let mut stream = self.stream.take().ok_or(LoglensError::Closed)?;

        let outcome = timeout(io_timeout, round_trip(&mut stream, &frame)).await;
        let body = match outcome {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::warn!(addr = %self.target, error = %e, "scribe send failed, closing connection");
                return Err(e);
            }
            Err(_) => {
                tracing::warn!(addr = %self.target, after = ?io_timeout, "scribe send timed out, closing connection");
                return Err(LoglensError::Timeout {
                    operation: "send",
                    after: io_timeout,
                });
            }
        };

        let reply = match wire::decode_log_reply(&body, seq_id) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(addr = %self.target, error = %e, "unreadable scribe reply, closing connection");
                return Err(e);
            }
        };
        self.stream = Some(stream);

        match reply {
            Reply::Success(code) => Ok(ResultCode::from_i32(code)),
            Reply::Exception { kind, message } => Err(LoglensError::Remote { kind, message }),
        }
    }
}
