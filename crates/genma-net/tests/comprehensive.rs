//! Comprehensive tests for genma-net
//!
//! Option merging and request building, plus round trips against a
//! one-shot local server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use genma_net::{
    request, Method, RequestDefaults, RequestError, RequestOptions, Requester, ResponseType, ResponseValue,
};
use serde_json::json;

/// Serve one canned response and hand back the raw request text
fn serve_once(status: &str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let raw = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        raw
    });

    (format!("http://{addr}"), handle)
}

/// Read headers, then as many body bytes as Content-Length announces
fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).unwrap();
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).into_owned();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + length || n == 0 {
                return text;
            }
        } else if n == 0 {
            return text;
        }
    }
}

#[test]
fn test_inject_merges_headers() {
    let api = Requester::new().inject(RequestDefaults {
        base_url: Some("https://api.example.com/v1/".into()),
        headers: vec![
            ("Authorization".into(), "Bearer a".into()),
            ("Accept".into(), "application/json".into()),
        ],
        ..Default::default()
    });

    let opts = RequestOptions::new().header("authorization", "Bearer b");
    let prepared = api.prepare("users", opts).unwrap();

    assert_eq!(prepared.url.as_str(), "https://api.example.com/v1/users");
    assert_eq!(prepared.headers.len(), 2);
    assert!(prepared.headers.contains(&("Authorization".into(), "Bearer b".into())));
    assert!(prepared.headers.contains(&("Accept".into(), "application/json".into())));
}

#[test]
fn test_inject_layers() {
    let base = Requester::new().inject(RequestDefaults {
        method: Some(Method::Post),
        timeout_ms: Some(1000),
        ..Default::default()
    });
    let text = base.inject(RequestDefaults {
        response_type: Some(ResponseType::Text),
        ..Default::default()
    });

    let prepared = text.prepare("https://example.com", RequestOptions::new()).unwrap();
    assert_eq!(prepared.method, Method::Post);
    assert_eq!(prepared.response_type, ResponseType::Text);
    assert_eq!(prepared.timeout, Some(std::time::Duration::from_millis(1000)));

    // The original requester is untouched
    assert_eq!(base.defaults().response_type, None);
}

#[test]
fn test_per_call_options_win() {
    let api = Requester::with_defaults(RequestDefaults {
        method: Some(Method::Post),
        response_type: Some(ResponseType::Text),
        ..Default::default()
    });
    let prepared = api
        .prepare("https://example.com", RequestOptions::new().method(Method::Delete).response_type(ResponseType::Json))
        .unwrap();
    assert_eq!(prepared.method, Method::Delete);
    assert_eq!(prepared.response_type, ResponseType::Json);
}

#[test]
fn test_relative_url_without_base() {
    let err = Requester::new().prepare("/users", RequestOptions::new()).unwrap_err();
    assert!(matches!(err, RequestError::InvalidUrl(_)));
}

#[test]
fn test_json_round_trip() {
    let (url, server) = serve_once("200 OK", r#"{"id":7,"name":"Ann"}"#);

    let value = request(
        &format!("{url}/users"),
        RequestOptions::new().method(Method::Post).json(json!({ "name": "Ann" })),
    )
    .unwrap();

    assert_eq!(value.as_json().unwrap()["id"], 7);
    let raw = server.join().unwrap();
    assert!(raw.starts_with("POST /users"));
    assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(raw.ends_with(r#"{"name":"Ann"}"#));
}

#[test]
fn test_text_response() {
    let (url, server) = serve_once("200 OK", "plain words");
    let value = request(&url, RequestOptions::new().response_type(ResponseType::Text)).unwrap();
    assert_eq!(value, ResponseValue::Text("plain words".into()));
    server.join().unwrap();
}

#[test]
fn test_error_status_carries_body() {
    let (url, server) = serve_once("404 Not Found", "no such user");
    let err = request(&url, RequestOptions::new()).unwrap_err();
    assert_eq!(err, RequestError::Status { status: 404, body: "no such user".into() });
    server.join().unwrap();
}
