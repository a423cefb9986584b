use std::sync::Arc;

use tokio::sync::Mutex;

use crate::builder::build_record;
use crate::echo::{Echo, StdoutEcho};
use crate::encode::encode;
use crate::error::Result;
use crate::record::{LogRecord, LogSource, ERROR, INFO, WARN};
use crate::transport::{ResultCode, Transport};

#[cfg(feature = "scribe")]
use crate::config::ClientConfig;
#[cfg(feature = "scribe")]
use crate::scribe::ScribeTransport;

/// User-facing entry point: builds, encodes and ships log records.
///
/// A client owns exactly one transport for its whole lifetime and sends
/// through it one record at a time, so it can be shared between tasks
/// behind an `Arc`. It never reopens a broken transport.
///
/// ```no_run
/// # async fn demo() -> loglens_client::Result<()> {
/// use loglens_client::{LogRecord, LogSource, LoglensClient};
///
/// let client = LoglensClient::connect_default().await?;
/// let source = LogSource::new("Here is a Loglens Message").with_username("peacock");
/// let code = client.error(LogRecord::new("peacock", source)).await?;
/// println!("collector answered {code}");
/// client.simple_log("WARN", "disk almost full", "peacock").await?;
/// # Ok(())
/// # }
/// ```
pub struct LoglensClient {
    category: String,
    transport: Mutex<Box<dyn Transport>>,
    echo: Arc<dyn Echo>,
}

impl LoglensClient {
    /// Build a client around an already open transport.
    ///
    /// **Parameters**
    /// - `category`: routing key attached to every payload.
    /// - `transport`: any [`Transport`]; the client takes ownership.
    pub fn with_transport(category: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            category: category.into(),
            transport: Mutex::new(Box::new(transport)),
            echo: Arc::new(StdoutEcho),
        }
    }

    /// Connect to a Scribe collector described by `config`.
    ///
    /// Fails with a connection-class error if the collector cannot be
    /// reached; no client is returned without a working transport.
    #[cfg(feature = "scribe")]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = ScribeTransport::connect(&config).await?;
        Ok(Self::with_transport(config.category, transport))
    }

    /// Connect to `localhost:1463` with category `loglens`.
    #[cfg(feature = "scribe")]
    pub async fn connect_default() -> Result<Self> {
        Self::connect(ClientConfig::default()).await
    }

    /// Replace the hook invoked for every record before it is sent.
    #[must_use]
    pub fn with_echo(mut self, echo: impl Echo + 'static) -> Self {
        self.echo = Arc::new(echo);
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Validate, enrich, encode and send `record`.
    ///
    /// **Returns**
    /// - `Ok(code)` with the collector's answer, unchanged.
    /// - `Err(..)` on validation, id generation, encoding or transport
    ///   failure. Validation happens before any network activity.
    pub async fn log(&self, record: LogRecord) -> Result<ResultCode> {
        let prepared = build_record(record)?;
        self.echo.echo(&prepared);
        let payload = encode(&prepared)?;
        self.raw_log(&payload).await
    }

    pub async fn info(&self, mut record: LogRecord) -> Result<ResultCode> {
        record.severity = INFO.to_string();
        self.log(record).await
    }

    pub async fn warn(&self, mut record: LogRecord) -> Result<ResultCode> {
        record.severity = WARN.to_string();
        self.log(record).await
    }

    pub async fn error(&self, mut record: LogRecord) -> Result<ResultCode> {
        record.severity = ERROR.to_string();
        self.log(record).await
    }

    /// One-line form of [`log`](Self::log) for records with only a
    /// message, an index and a severity.
    pub async fn simple_log(&self, severity: &str, message: &str, index: &str) -> Result<ResultCode> {
        let record = LogRecord::new(index, LogSource::new(message)).with_severity(severity);
        self.log(record).await
    }

    /// Send an already encoded payload under this client's category.
    pub async fn raw_log(&self, payload: &str) -> Result<ResultCode> {
        let mut transport = self.transport.lock().await;
        let code = transport.send(&self.category, payload).await?;
        tracing::debug!(category = %self.category, code = %code, bytes = payload.len(), "log payload delivered");
        Ok(code)
    }
}
