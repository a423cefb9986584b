use crate::record::PreparedRecord;

/// Observability hook invoked once per record just before it is sent.
///
/// The default [`StdoutEcho`] prints a short line so log calls are visible
/// immediately on the console. Swap it via
/// [`LoglensClient::with_echo`](crate::client::LoglensClient::with_echo)
/// to route the line elsewhere or to silence it.
pub trait Echo: Send + Sync {
    fn echo(&self, record: &PreparedRecord);
}

/// `[<timestamp> <severity>] <message>`
pub fn echo_line(record: &PreparedRecord) -> String {
    format!(
        "[{} {}] {}",
        record.timestamp(),
        record.severity(),
        record.source().message
    )
}

/// Prints [`echo_line`] to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutEcho;

impl Echo for StdoutEcho {
    fn echo(&self, record: &PreparedRecord) {
        println!("{}", echo_line(record));
    }
}

/// Emits the record as a `tracing` event at INFO level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEcho;

impl Echo for TracingEcho {
    fn echo(&self, record: &PreparedRecord) {
        tracing::info!(
            index = record.index(),
            severity = record.severity(),
            id = record.id(),
            timestamp = record.timestamp(),
            "{}",
            record.source().message
        );
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEcho;

impl Echo for SilentEcho {
    fn echo(&self, _record: &PreparedRecord) {}
}

impl<F> Echo for F
where
    F: Fn(&PreparedRecord) + Send + Sync,
{
    fn echo(&self, record: &PreparedRecord) {
        self(record)
    }
}
