use std::cell::Cell;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Answers every request with the same raw HTTP response and counts requests.
fn canned_server(response: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).is_ok_and(|n| n > 0) && line != "\r\n" {
                line.clear();
            }
            let _ = stream.write_all(response.as_bytes());
        }
    });
    (format!("http://{}", addr), hits)
}

#[test]
fn with_retries_returns_first_success() {
    let calls = Cell::new(0);
    let out = with_retries("list", || {
        calls.set(calls.get() + 1);
        if calls.get() < 2 {
            Err(PinsError::remote("list", "flaky"))
        } else {
            Ok(7)
        }
    })
    .unwrap();
    assert_eq!(out, 7);
    assert_eq!(calls.get(), 2);
}

#[test]
fn with_retries_does_not_retry_auth_failures() {
    let calls = Cell::new(0);
    let err = with_retries::<()>("list", || {
        calls.set(calls.get() + 1);
        Err(PinsError::NotAuthenticated)
    })
    .unwrap_err();
    assert!(matches!(err, PinsError::NotAuthenticated));
    assert_eq!(calls.get(), 1);
}

#[test]
fn client_without_token_is_not_authenticated() {
    let err = XrpcClient::new("http://localhost:1", String::new(), Duration::from_secs(1))
        .err()
        .unwrap();
    assert!(matches!(err, PinsError::NotAuthenticated));
}

#[test]
fn xrpc_urls_strip_trailing_slash() {
    let client =
        XrpcClient::new("http://pds.test/", "t".to_string(), Duration::from_secs(1)).unwrap();
    assert_eq!(
        client.url("com.atproto.sync.listBlobs"),
        "http://pds.test/xrpc/com.atproto.sync.listBlobs"
    );
    assert_eq!(client.auth(), "Bearer t");
}

#[test]
fn with_retries_gives_up_on_client_errors() {
    let calls = Cell::new(0);
    let err = with_retries::<()>("get", || {
        calls.set(calls.get() + 1);
        Err(PinsError::remote_status("get", 400, "RecordNotFound"))
    })
    .unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(calls.get(), 1);
}

#[test]
fn retry_policy_by_status() {
    assert!(PinsError::remote("list", "connection reset").is_retryable());
    assert!(PinsError::remote_status("list", 502, "Bad Gateway").is_retryable());
    assert!(!PinsError::remote_status("list", 501, "MethodNotImplemented").is_retryable());
    assert!(!PinsError::remote_status("list", 404, "Not Found").is_retryable());
    assert!(!PinsError::validation("bad").is_retryable());
}

#[test]
fn unparsable_body_is_not_retried() {
    let (url, hits) = canned_server(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\nConnection: close\r\n\r\nnot json",
    );
    let client = XrpcClient::new(&url, "t".to_string(), Duration::from_secs(5)).unwrap();

    let err = client
        .list_records("did:plc:x", crate::model::COLLECTION, None, 10)
        .unwrap_err();
    assert!(matches!(
        err,
        PinsError::RemoteCallFailed {
            status: Some(200),
            ..
        }
    ));
    assert!(!err.is_retryable());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
