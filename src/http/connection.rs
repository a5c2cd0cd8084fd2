use std::any::Any;
use std::fmt;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::BytesMut;
use futures_util::FutureExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::context::ServerContext;
use crate::error::{ServeError, ServeResult};
use crate::http::parser::parse_http_request;
use crate::http::response::Response;
use crate::http::writer::write_response;
use crate::server::pipeline::{self, Outcome};

/// Size of the single read performed per connection.
pub const READ_BUFFER_SIZE: usize = 8192;

type SharedWriter = Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>;

/// Write access to the client connection, shared with extension hooks.
///
/// A hook that answers the request itself writes through this handle and
/// then returns `HookFlow::Halt`.
#[derive(Clone)]
pub struct ConnectionHandle {
    peer: SocketAddr,
    writer: SharedWriter,
}

impl ConnectionHandle {
    pub fn new<W>(peer: SocketAddr, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            peer,
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub async fn write_all(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(bytes).await?;
        writer.flush().await
    }

    pub async fn send(&self, response: &Response) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        write_response(&mut *writer, response).await
    }

    pub async fn shutdown(&self) -> std::io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

/// One accepted connection: exactly one read, one pipeline run, one write.
pub struct Connection<R> {
    reader: R,
    handle: ConnectionHandle,
    ctx: Arc<ServerContext>,
}

impl Connection<tokio::net::tcp::OwnedReadHalf> {
    pub fn new(stream: TcpStream, peer: SocketAddr, ctx: Arc<ServerContext>) -> Self {
        let (reader, writer) = stream.into_split();
        Self::from_parts(reader, ConnectionHandle::new(peer, writer), ctx)
    }
}

impl<R> Connection<R>
where
    R: AsyncRead + Unpin,
{
    pub fn from_parts(reader: R, handle: ConnectionHandle, ctx: Arc<ServerContext>) -> Self {
        Self {
            reader,
            handle,
            ctx,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut buffer = BytesMut::with_capacity(READ_BUFFER_SIZE);
        let n = self.reader.read_buf(&mut buffer).await?;

        if n == 0 {
            // Client closed without sending anything
            debug!(peer = %self.handle.peer(), "Connection closed before request");
            return Ok(());
        }

        let outcome = AssertUnwindSafe(self.process(&buffer))
            .catch_unwind()
            .await;
        let response = finish(outcome, self.handle.peer());

        if let Some(response) = response {
            self.handle.send(&response).await?;
        }
        self.handle.shutdown().await?;
        Ok(())
    }

    async fn process(&self, buffer: &[u8]) -> ServeResult<Outcome> {
        let mut request = match parse_http_request(buffer) {
            Ok(request) => request,
            Err(err) => {
                debug!(peer = %self.handle.peer(), error = %err, "Malformed request");
                return Ok(Outcome::Respond(Response::for_error(&ServeError::from(err))));
            }
        };
        request.connection = Some(self.handle.clone());

        pipeline::process(&self.ctx, &request, self.handle.peer().ip()).await
    }
}

type Caught = Result<ServeResult<Outcome>, Box<dyn Any + Send>>;

/// Maps a caught pipeline result onto what goes back on the wire. Failures
/// and panics both become a bare 500; `None` means a hook already answered.
fn finish(outcome: Caught, peer: SocketAddr) -> Option<Response> {
    match outcome {
        Ok(Ok(Outcome::Respond(response))) => Some(response),
        Ok(Ok(Outcome::Halted)) => None,
        Ok(Err(err)) => {
            error!(%peer, error = ?err, "Request handling failed");
            Some(Response::internal_error())
        }
        Err(panic) => {
            // The backtrace is logged by the process panic hook at the panic site
            error!(
                %peer,
                panic = panic_message(panic.as_ref()),
                "Request handling panicked"
            );
            Some(Response::internal_error())
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
