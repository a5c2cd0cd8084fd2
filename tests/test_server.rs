//! End-to-end tests over real TCP connections.

mod common;

use async_trait::async_trait;
use common::{context, roundtrip, sample_root, spawn_server, split_response, test_config};
use lynx::hooks::{BeforeRequestHook, HookFlow, HookRegistry, HookResult};
use lynx::http::request::Request;
use lynx::http::response::Response;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[tokio::test]
async fn test_root_serves_index_bytes() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    let (status, head, body) = split_response(&raw);

    assert_eq!(status, 200);
    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Length: 13"));
    assert_eq!(body, b"<h1>home</h1>");
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(addr, b"GET /missing.txt HTTP/1.1\r\n\r\n").await;
    let (status, head, body) = split_response(&raw);

    assert_eq!(status, 404);
    assert!(head.starts_with("HTTP/1.1 404 Not Found"));
    assert_eq!(body, b"404 Not Found");
}

#[tokio::test]
async fn test_traversal_never_escapes() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    for target in ["/../../etc/passwd", "/..%2F..%2Fetc%2Fpasswd", "/docs/../../../etc/passwd"] {
        let raw = roundtrip(addr, format!("GET {target} HTTP/1.1\r\n\r\n").as_bytes()).await;
        let (status, _, _) = split_response(&raw);
        assert_eq!(status, 404, "{target}");
    }
}

#[tokio::test]
async fn test_malformed_request_is_400() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(addr, b"NONSENSE\r\n\r\n").await;
    let (status, head, body) = split_response(&raw);

    assert_eq!(status, 400);
    assert!(head.contains("Content-Length: 0"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_post_echoes_form_over_wire() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(
        addr,
        b"POST /hello.txt HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\ncolor=grey&size=medium",
    )
    .await;
    let (status, _, body) = split_response(&raw);
    let body = String::from_utf8(body).unwrap();

    assert_eq!(status, 200);
    assert!(body.contains(r#""color": ["grey"]"#));
    assert!(body.contains(r#""size": ["medium"]"#));
}

#[tokio::test]
async fn test_binary_file_roundtrip() {
    let dir = sample_root();
    let payload: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
    std::fs::write(dir.path().join("blob.bin"), &payload).unwrap();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(addr, b"GET /blob.bin HTTP/1.1\r\n\r\n").await;
    let (status, head, body) = split_response(&raw);

    assert_eq!(status, 200);
    assert!(head.contains("Content-Length: 20000"));
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_unconfigured_favicon_falls_through() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let raw = roundtrip(addr, b"GET /favicon.ico HTTP/1.1\r\n\r\n").await;
    assert_eq!(split_response(&raw).0, 404);

    std::fs::write(dir.path().join("favicon.ico"), b"ico").unwrap();
    let raw = roundtrip(addr, b"GET /favicon.ico HTTP/1.1\r\n\r\n").await;
    let (status, _, body) = split_response(&raw);
    assert_eq!(status, 200);
    assert_eq!(body, b"ico");
}

/// Answers `/hook` itself through the connection handle.
struct DirectAnswer;

#[async_trait]
impl BeforeRequestHook for DirectAnswer {
    async fn before_request(&self, request: &Request) -> HookResult<HookFlow> {
        if request.path != "/hook" {
            return Ok(HookFlow::Continue);
        }
        let connection = request
            .connection
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no connection"))?;
        connection.send(&Response::ok("from hook")).await?;
        Ok(HookFlow::Halt)
    }
}

#[tokio::test]
async fn test_hook_answers_on_connection() {
    let dir = sample_root();
    let mut hooks = HookRegistry::new();
    hooks.on_before_request(DirectAnswer);
    let addr = spawn_server(context(dir.path(), test_config(), hooks)).await;

    let raw = roundtrip(addr, b"GET /hook HTTP/1.1\r\n\r\n").await;
    let (status, _, body) = split_response(&raw);

    // Exactly one response on the wire
    assert_eq!(status, 200);
    assert_eq!(body, b"from hook");

    let raw = roundtrip(addr, b"GET /hello.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(split_response(&raw).2, b"hello world\n");
}

struct Crash;

#[async_trait]
impl BeforeRequestHook for Crash {
    async fn before_request(&self, request: &Request) -> HookResult<HookFlow> {
        if request.path == "/crash" {
            panic!("extension crashed");
        }
        Ok(HookFlow::Continue)
    }
}

#[tokio::test]
async fn test_hook_panic_does_not_take_down_server() {
    let dir = sample_root();
    let mut hooks = HookRegistry::new();
    hooks.on_before_request(Crash);
    let addr = spawn_server(context(dir.path(), test_config(), hooks)).await;

    let raw = roundtrip(addr, b"GET /crash HTTP/1.1\r\n\r\n").await;
    assert_eq!(split_response(&raw).0, 404);

    let raw = roundtrip(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(split_response(&raw).0, 200);
}

#[tokio::test]
async fn test_silent_client_does_not_block_others() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    // Connects and never sends anything
    let _idle = TcpStream::connect(addr).await.unwrap();

    let raw = roundtrip(addr, b"GET /hello.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(split_response(&raw).0, 200);
}

#[tokio::test]
async fn test_client_closing_early_gets_no_response() {
    let dir = sample_root();
    let addr = spawn_server(context(dir.path(), test_config(), HookRegistry::new())).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut out = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
}
