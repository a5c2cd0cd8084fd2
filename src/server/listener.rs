use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{debug, error, info, warn};

use crate::context::ServerContext;
use crate::http::connection::Connection;

/// Pending connections the kernel may queue before `accept`.
pub const ACCEPT_BACKLOG: u32 = 50;

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct Listener {
    inner: TcpListener,
    ctx: Arc<ServerContext>,
}

impl Listener {
    /// Binds the configured host and port with address reuse enabled.
    pub async fn bind(ctx: Arc<ServerContext>) -> anyhow::Result<Self> {
        let listen_addr = ctx.config.listen_addr();
        let addr = tokio::net::lookup_host(&listen_addr)
            .await
            .with_context(|| format!("resolving {listen_addr}"))?
            .next()
            .with_context(|| format!("no address for {listen_addr}"))?;

        let inner = bind_socket(addr).with_context(|| format!("binding {addr}"))?;
        Ok(Self { inner, ctx })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Accepts forever, one task per connection. A failing connection only
    /// ever affects itself.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "Serving {} on {}",
            self.ctx.web_root.path().display(),
            self.local_addr()?
        );

        loop {
            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    // Persistent failures such as EMFILE would otherwise spin
                    warn!(error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };
            debug!("Accepted connection from {}", peer);

            let ctx = self.ctx.clone();
            tokio::spawn(async move {
                let conn = Connection::new(socket, peer, ctx);
                if let Err(e) = conn.run().await {
                    error!("Connection error from {}: {:?}", peer, e);
                }
            });
        }
    }
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(ACCEPT_BACKLOG)
}
