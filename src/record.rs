use serde::Serialize;

/// Conventional severity for informational records.
pub const INFO: &str = "INFO";
/// Conventional severity for warnings.
pub const WARN: &str = "WARN";
/// Conventional severity for errors.
pub const ERROR: &str = "ERROR";

/// Caller-supplied payload of a log record.
///
/// Only the fields a caller may set live here. The originating host and
/// creation time are attached by [`build_record`](crate::builder::build_record)
/// at send time and appear on [`PreparedRecord`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSource {
    /// Human-readable text. Required.
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Secondary classification, independent of the record severity.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Logical actor or service emitting the record.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
}

impl LogSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

/// Outer envelope as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRecord {
    /// Destination routing key on the collector. Required.
    pub index: String,
    pub source: LogSource,
    /// Log level, e.g. [`INFO`]. The severity helpers on the client
    /// overwrite it.
    pub severity: String,
}

impl LogRecord {
    pub fn new(index: impl Into<String>, source: LogSource) -> Self {
        Self {
            index: index.into(),
            source,
            severity: String::new(),
        }
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }
}

/// A record enriched with its generated fields, ready for encoding.
///
/// Only the record builder can produce one, so `id`, `hostname` and
/// `@timestamp` are never caller-controlled.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedRecord {
    index: String,
    source: StampedSource,
    #[serde(rename = "type")]
    severity: String,
    id: String,
}

#[derive(Debug, Clone, Serialize)]
struct StampedSource {
    #[serde(flatten)]
    fields: LogSource,
    hostname: String,
    #[serde(rename = "@timestamp")]
    timestamp: String,
}

impl PreparedRecord {
    pub(crate) fn new(record: LogRecord, hostname: String, timestamp: String, id: String) -> Self {
        Self {
            index: record.index,
            source: StampedSource {
                fields: record.source,
                hostname,
                timestamp,
            },
            severity: record.severity,
            id,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn source(&self) -> &LogSource {
        &self.source.fields
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hostname(&self) -> &str {
        &self.source.hostname
    }

    pub fn timestamp(&self) -> &str {
        &self.source.timestamp
    }
}
