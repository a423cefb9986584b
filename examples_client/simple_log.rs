use loglens_client::echo::TracingEcho;
use loglens_client::{ClientConfig, LogRecord, LogSource, LoglensClient};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // LOGLENS_HOST / LOGLENS_PORT / LOGLENS_CATEGORY override localhost:1463/loglens
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let client = match LoglensClient::connect(config).await {
        Ok(client) => client.with_echo(TracingEcho),
        Err(e) => {
            eprintln!("cannot reach collector: {e}");
            std::process::exit(1);
        }
    };

    let message = "Here is a Loglens Message";

    // fully explicit record
    let source = LogSource::new(message)
        .with_username("peacock")
        .with_tag("rust")
        .with_type("INFO");
    let record = LogRecord::new("peacock", source).with_severity("INFO");
    println!("{:?}", client.log(record).await);

    // severity helper
    let record = LogRecord::new("peacock", LogSource::new(message).with_username("peacock"));
    println!("{:?}", client.error(record).await);

    // one-liner
    println!("{:?}", client.simple_log("WARN", message, "peacock").await);
}
