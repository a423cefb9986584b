use std::time::Instant;

use async_trait::async_trait;
use loglens_client::noop_transport::NoopTransport;
use loglens_client::echo::SilentEcho;
use loglens_client::{LogRecord, LogSource, LoglensClient, ResultCode, Transport};

/// Example of delivering payloads through a custom transport by
/// implementing the `Transport` trait directly. Imagine this writes to a
/// message bus for which this crate has no built-in transport.
struct PrintTransport;

#[async_trait]
impl Transport for PrintTransport {
    async fn send(&mut self, category: &str, payload: &str) -> loglens_client::Result<ResultCode> {
        println!("[{category}] {payload}");
        Ok(ResultCode::Ok)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let client = LoglensClient::with_transport("loglens", PrintTransport);
    let record = LogRecord::new("peacock", LogSource::new("custom transport example"));
    if let Err(e) = client.info(record).await {
        eprintln!("send failed: {e}");
    }

    // overhead of building and encoding records without any I/O
    let client = LoglensClient::with_transport("loglens", NoopTransport).with_echo(SilentEcho);
    let n: u64 = 100_000;
    let start = Instant::now();
    for i in 0..n {
        let _ = client.simple_log("INFO", &format!("iteration {i}"), "load").await;
    }
    let elapsed = start.elapsed();
    println!(
        "noop transport: sent {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
