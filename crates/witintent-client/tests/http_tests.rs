//! End-to-end tests for the HTTP transport against a local one-shot server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use witintent_client::{ClientConfig, ErrorKind, IntentClient};

/// Read the request head (up to the blank line).
fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() > 64 * 1024 {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serve exactly one response, returning the endpoint URL and a handle
/// yielding the raw request head.
fn serve_once(status: u16, reason: &str, body: &str) -> (String, JoinHandle<String>) {
    serve_raw(format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ))
}

/// Write `response` verbatim to the first connection, then close it.
fn serve_raw(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let head = read_head(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        head
    });
    (format!("http://{addr}/message"), handle)
}

/// Accept one connection and never answer.
fn serve_silent(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _ = read_head(&mut stream);
            thread::sleep(hold);
        }
    });
    format!("http://{addr}/message")
}

fn client_for(endpoint: &str, token: &str) -> IntentClient {
    IntentClient::with_config(ClientConfig::new(token).with_endpoint(endpoint)).unwrap()
}

const GREET_BYE: &str = r#"{"msg_id":"abc","_text":"hi","entities":{"intent":[{"value":"greet","confidence":0.9},{"value":"bye","confidence":0.4}]}}"#;

#[test]
fn classifies_over_http() {
    let (endpoint, server) = serve_once(200, "OK", GREET_BYE);
    let client = client_for(&endpoint, "secret-token");

    assert_eq!(client.classify("hello there").unwrap(), vec!["greet"]);

    let head = server.join().unwrap();
    let request_line = head.lines().next().unwrap();
    assert_eq!(request_line, "GET /message?v=20170307&q=hello+there HTTP/1.1");
    let lower = head.to_ascii_lowercase();
    assert!(lower.contains("authorization: bearer secret-token"), "{head}");
    assert!(lower.contains("connection: close"), "{head}");
}

#[test]
fn remote_error_carries_body() {
    let (endpoint, server) = serve_once(400, "Bad Request", "invalid token");
    let client = client_for(&endpoint, "bad");

    let err = client.classify("hi").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("invalid token"));
    server.join().unwrap();
}

#[test]
fn malformed_body_is_decode_error() {
    let (endpoint, server) = serve_once(200, "OK", "definitely not json");
    let client = client_for(&endpoint, "tok");

    let err = client.classify("hi").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    server.join().unwrap();
}

#[test]
fn short_body_is_read_error() {
    let (endpoint, server) = serve_raw(
        "HTTP/1.1 200 OK\r\nContent-Length: 500\r\nConnection: close\r\n\r\n{\"msg_id\"".to_string(),
    );
    let client = client_for(&endpoint, "tok");

    let err = client.classify("hi").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Read);
    assert!(err.is_read());
    server.join().unwrap();
}

#[test]
fn short_body_on_error_status_is_empty_remote_error() {
    let (endpoint, server) = serve_raw(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 500\r\nConnection: close\r\n\r\nbusy".to_string(),
    );
    let client = client_for(&endpoint, "tok");

    let err = client.classify("hi").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.message(), "wit.ai error: ");
    server.join().unwrap();
}

#[test]
fn truncated_text_on_the_wire() {
    let (endpoint, server) = serve_once(200, "OK", GREET_BYE);
    let client = client_for(&endpoint, "tok");
    client.classify(&"é".repeat(300)).unwrap();

    let head = server.join().unwrap();
    let target = head.split_whitespace().nth(1).unwrap();
    let url = url::Url::parse(&format!("http://localhost{target}")).unwrap();
    let q = url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(q.chars().count(), 263);
    assert!(q.ends_with("..."));
}

#[test]
fn timeout_returns_promptly() {
    let endpoint = serve_silent(Duration::from_secs(5));
    let mut client = client_for(&endpoint, "tok");
    client.set_timeout(Duration::from_millis(300)).unwrap();

    let started = Instant::now();
    let err = client.classify("hi").unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_transport());
    assert!(err.is_timeout());
    assert!(elapsed >= Duration::from_millis(250), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
}

#[test]
fn connection_refused_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(&format!("http://{addr}/message"), "tok");

    let err = client.classify("hi").unwrap_err();
    assert!(err.is_transport());
    assert!(!err.is_timeout());
}
