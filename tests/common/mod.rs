//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use lynx::config::Config;
use lynx::context::ServerContext;
use lynx::files::WebRoot;
use lynx::hooks::HookRegistry;
use lynx::http::request::{Method, Request, RequestBuilder};
use lynx::server::Listener;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// A temporary web root with:
///
/// ```text
/// index.html
/// hello.txt
/// docs/a.txt
/// docs/b.md
/// private/secret.txt
/// site/index.html
/// ```
pub fn sample_root() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path();
    std::fs::write(base.join("index.html"), b"<h1>home</h1>").unwrap();
    std::fs::write(base.join("hello.txt"), b"hello world\n").unwrap();
    std::fs::create_dir(base.join("docs")).unwrap();
    std::fs::write(base.join("docs/a.txt"), b"a").unwrap();
    std::fs::write(base.join("docs/b.md"), b"# b").unwrap();
    std::fs::create_dir(base.join("private")).unwrap();
    std::fs::write(base.join("private/secret.txt"), b"secret").unwrap();
    std::fs::create_dir(base.join("site")).unwrap();
    std::fs::write(base.join("site/index.html"), b"<p>site</p>").unwrap();
    dir
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        browsable_dirs: ["/docs".to_string()].into_iter().collect(),
        favicon: None,
        ..Config::default()
    }
}

pub fn context(root: &Path, config: Config, hooks: HookRegistry) -> ServerContext {
    ServerContext::new(config, WebRoot::create(root).expect("web root"), hooks)
}

pub fn get(path: &str) -> Request {
    request(Method::GET, path)
}

pub fn request(method: Method, path: &str) -> Request {
    RequestBuilder::new().method(method).path(path).build().unwrap()
}

/// Binds a listener on an ephemeral port and runs it in the background.
pub async fn spawn_server(ctx: ServerContext) -> SocketAddr {
    let listener = Listener::bind(Arc::new(ctx)).await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(listener.run());
    addr
}

/// Sends raw bytes and reads until the server closes the connection.
pub async fn roundtrip(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(raw).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

/// Splits a raw response into status code, head text and body bytes.
pub fn split_response(raw: &[u8]) -> (u16, String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    (status, head, raw[end + 4..].to_vec())
}
