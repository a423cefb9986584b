//! End-to-end tests against an in-process fake Scribe collector.

#![cfg(feature = "scribe")]

use std::sync::Arc;
use std::time::Duration;

use loglens_client::echo::SilentEcho;
use loglens_client::{ClientConfig, LogRecord, LogSource, LoglensClient, LoglensError, ResultCode};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// What the fake collector answers to each `Log` call.
#[derive(Clone, Copy)]
enum Answer {
    Code(i32),
    Exception(i32),
    /// Result code sent only after a pause.
    Delayed(i32, Duration),
}

#[derive(Debug)]
struct Received {
    seq_id: i32,
    entries: Vec<(String, String)>,
}

struct Cursor<'a>(&'a [u8]);

impl Cursor<'_> {
    fn take(&mut self, n: usize) -> &[u8] {
        let (head, tail) = self.0.split_at(n);
        self.0 = tail;
        head
    }
    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }
    fn i16(&mut self) -> i16 {
        i16::from_be_bytes(self.take(2).try_into().unwrap())
    }
    fn i32(&mut self) -> i32 {
        i32::from_be_bytes(self.take(4).try_into().unwrap())
    }
    fn string(&mut self) -> String {
        let len = self.i32() as usize;
        String::from_utf8(self.take(len).to_vec()).unwrap()
    }
}

fn parse_log_call(body: &[u8]) -> Received {
    let mut c = Cursor(body);
    assert_eq!(c.i32() as u32, 0x8001_0001, "strict CALL header");
    assert_eq!(c.string(), "Log");
    let seq_id = c.i32();

    assert_eq!(c.u8(), 15, "list field");
    assert_eq!(c.i16(), 1);
    assert_eq!(c.u8(), 12, "list of structs");
    let count = c.i32();

    let mut entries = Vec::new();
    for _ in 0..count {
        let mut category = String::new();
        let mut message = String::new();
        loop {
            let field_type = c.u8();
            if field_type == 0 {
                break;
            }
            match c.i16() {
                1 => category = c.string(),
                2 => message = c.string(),
                id => panic!("unexpected LogEntry field {id}"),
            }
        }
        entries.push((category, message));
    }
    assert_eq!(c.u8(), 0, "args stop");
    Received { seq_id, entries }
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as i32).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn encode_answer(seq_id: i32, answer: Answer) -> Vec<u8> {
    let mut body = Vec::new();
    match answer {
        Answer::Code(code) | Answer::Delayed(code, _) => {
            body.extend_from_slice(&0x8001_0002u32.to_be_bytes());
            put_string(&mut body, "Log");
            body.extend_from_slice(&seq_id.to_be_bytes());
            body.push(8);
            body.extend_from_slice(&0i16.to_be_bytes());
            body.extend_from_slice(&code.to_be_bytes());
            body.push(0);
        }
        Answer::Exception(kind) => {
            body.extend_from_slice(&0x8001_0003u32.to_be_bytes());
            put_string(&mut body, "Log");
            body.extend_from_slice(&seq_id.to_be_bytes());
            body.push(11);
            body.extend_from_slice(&1i16.to_be_bytes());
            put_string(&mut body, "collector exploded");
            body.push(8);
            body.extend_from_slice(&2i16.to_be_bytes());
            body.extend_from_slice(&kind.to_be_bytes());
            body.push(0);
        }
    }
    let mut frame = (body.len() as u32).to_be_bytes().to_vec();
    frame.extend_from_slice(&body);
    frame
}

async fn serve(mut socket: TcpStream, answer: Answer, tx: mpsc::UnboundedSender<Received>) {
    loop {
        let mut len = [0u8; 4];
        if socket.read_exact(&mut len).await.is_err() {
            return;
        }
        let mut body = vec![0u8; u32::from_be_bytes(len) as usize];
        socket.read_exact(&mut body).await.unwrap();

        let received = parse_log_call(&body);
        let seq_id = received.seq_id;
        let _ = tx.send(received);
        if let Answer::Delayed(_, pause) = answer {
            tokio::time::sleep(pause).await;
        }
        if socket.write_all(&encode_answer(seq_id, answer)).await.is_err() {
            return;
        }
    }
}

/// Start a single-connection collector; returns its config and a stream of
/// decoded calls.
async fn start_collector(answer: Answer) -> (ClientConfig, mpsc::UnboundedReceiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        serve(socket, answer, tx).await;
    });
    (ClientConfig::new("127.0.0.1", port), rx)
}

#[tokio::test]
async fn simple_log_reaches_collector() {
    let (config, mut rx) = start_collector(Answer::Code(0)).await;
    let client = LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho);

    let code = client
        .simple_log("WARN", "Here is a Loglens Message", "peacock")
        .await
        .unwrap();
    assert_eq!(code, ResultCode::Ok);

    let received = rx.recv().await.unwrap();
    assert_eq!(received.seq_id, 1);
    assert_eq!(received.entries.len(), 1);
    let (category, payload) = &received.entries[0];
    assert_eq!(category, "loglens");

    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload["index"], "peacock");
    assert_eq!(payload["type"], "WARN");
    assert_eq!(payload["source"]["message"], "Here is a Loglens Message");
    assert!(payload["source"]["@timestamp"].as_str().unwrap().ends_with(".000"));
    assert!(payload["source"].get("tag").is_none());
}

#[tokio::test]
async fn category_comes_from_config() {
    let (config, mut rx) = start_collector(Answer::Code(0)).await;
    let client = LoglensClient::connect(config.with_category("audit"))
        .await
        .unwrap()
        .with_echo(SilentEcho);

    let source = LogSource::new("login").with_username("peacock").with_tag("auth");
    client.info(LogRecord::new("security", source)).await.unwrap();

    let received = rx.recv().await.unwrap();
    let (category, payload) = &received.entries[0];
    assert_eq!(category, "audit");
    let payload: Value = serde_json::from_str(payload).unwrap();
    assert_eq!(payload["source"]["username"], "peacock");
    assert_eq!(payload["source"]["tag"], "auth");
    assert_eq!(payload["type"], "INFO");
}

#[tokio::test]
async fn try_later_is_passed_through() {
    let (config, _rx) = start_collector(Answer::Code(1)).await;
    let client = LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho);

    let code = client.simple_log("INFO", "queue me", "peacock").await.unwrap();
    assert_eq!(code, ResultCode::TryLater);
}

#[tokio::test]
async fn collector_exception_surfaces_as_remote_error() {
    let (config, _rx) = start_collector(Answer::Exception(6)).await;
    let client = LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho);

    let err = client.simple_log("INFO", "m", "i").await.unwrap_err();
    match err {
        LoglensError::Remote { kind, message } => {
            assert_eq!(kind, 6);
            assert_eq!(message, "collector exploded");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_collector_fails_construction() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new("127.0.0.1", port).with_connect_timeout(Duration::from_secs(2));
    let err = match LoglensClient::connect(config).await {
        Ok(_) => panic!("connected to a closed port"),
        Err(e) => e,
    };
    assert!(err.is_connection(), "{err}");
}

#[tokio::test]
async fn invalid_record_never_touches_the_wire() {
    let (config, mut rx) = start_collector(Answer::Code(0)).await;
    let client = LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho);

    let err = client.simple_log("INFO", "", "peacock").await.unwrap_err();
    assert!(matches!(err, LoglensError::Validation { field: "message" }));

    // the next valid call is the first thing the collector sees
    client.simple_log("INFO", "ok", "peacock").await.unwrap();
    let received = rx.recv().await.unwrap();
    assert_eq!(received.seq_id, 1);
    let payload: Value = serde_json::from_str(&received.entries[0].1).unwrap();
    assert_eq!(payload["source"]["message"], "ok");
}

#[tokio::test]
async fn concurrent_sends_are_serialized() {
    let (config, mut rx) = start_collector(Answer::Code(0)).await;
    let client = Arc::new(LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho));

    let mut handles = Vec::new();
    for i in 0..16 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client.simple_log("INFO", &format!("task {i}"), "peacock").await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), ResultCode::Ok);
    }

    let mut seq_ids = Vec::new();
    for _ in 0..16 {
        seq_ids.push(rx.recv().await.unwrap().seq_id);
    }
    assert_eq!(seq_ids, (1..=16).collect::<Vec<i32>>());
}

#[tokio::test]
async fn cancelled_log_leaves_client_reporting_connection_errors() {
    let (config, mut rx) = start_collector(Answer::Delayed(0, Duration::from_millis(100))).await;
    let client = LoglensClient::connect(config).await.unwrap().with_echo(SilentEcho);

    // caller gives up while the collector is still answering
    let cancelled = tokio::time::timeout(
        Duration::from_millis(20),
        client.simple_log("INFO", "first", "peacock"),
    )
    .await;
    assert!(cancelled.is_err());
    assert_eq!(rx.recv().await.unwrap().seq_id, 1);

    for i in 0..3 {
        let err = client
            .simple_log("INFO", &format!("retry {i}"), "peacock")
            .await
            .unwrap_err();
        assert!(err.is_connection(), "{err}");
        assert!(matches!(err, LoglensError::Closed));
    }
}
