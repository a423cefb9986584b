use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{LoglensError, Result};
use crate::record::{LogRecord, PreparedRecord};

/// Validate `record` and attach its generated fields.
///
/// Fails with [`LoglensError::Validation`] when `index` or
/// `source.message` is empty, and with
/// [`LoglensError::RandomnessUnavailable`] when no id can be generated.
/// Hostname lookup failures are not fatal: the record is sent with an
/// empty hostname.
pub fn build_record(record: LogRecord) -> Result<PreparedRecord> {
    validate(&record)?;
    let timestamp = stamp();
    let hostname = local_hostname();
    let id = generate_id()?;
    Ok(PreparedRecord::new(record, hostname, timestamp, id))
}

pub fn validate(record: &LogRecord) -> Result<()> {
    if record.index.is_empty() {
        return Err(LoglensError::validation("index"));
    }
    if record.source.message.is_empty() {
        return Err(LoglensError::validation("message"));
    }
    Ok(())
}

/// 128 random bits from the OS rendered as a hyphenated 8-4-4-4-12 string.
pub fn generate_id() -> Result<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(LoglensError::RandomnessUnavailable)?;
    Ok(Uuid::from_bytes(bytes).hyphenated().to_string())
}

/// Current UTC time in the collector's timestamp format.
pub fn stamp() -> String {
    format_timestamp(Utc::now())
}

/// Second-precision RFC 3339 with the `Z` suffix replaced by `.000`.
///
/// The collector expects this exact shape, e.g. `2024-01-01T00:00:00.000`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
        .replacen('Z', ".000", 1)
}

/// Looked up on every call so the value tracks the sending machine.
pub fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "hostname lookup failed, sending empty hostname");
            String::new()
        }
    }
}
