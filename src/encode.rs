use crate::error::Result;
use crate::record::PreparedRecord;

/// Serialize a prepared record to the compact JSON payload the collector
/// parses.
///
/// Outer keys are `index`, `source`, `type`, `id`. The source object carries
/// `message`, then `tag`, `type` and `username` only when non-empty, then
/// `hostname` and `@timestamp`.
pub fn encode(record: &PreparedRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}
