//! Extension hook points.
//!
//! Extensions contribute callbacks to a fixed set of named hook points.
//! The registry is filled once at startup by the loader and is read-only
//! while the server runs.
//!
//! | Hook point          | Invoked by                         |
//! |---------------------|------------------------------------|
//! | `before_request`    | request pipeline, after IP filter  |
//! | `after_request`     | request pipeline, before encoding  |
//! | `websocket_connect` | connection-oriented collaborators  |
//! | `websocket_message` | connection-oriented collaborators  |
//! | `websocket_close`   | connection-oriented collaborators  |

pub mod access_log;
pub mod loader;
pub mod pipeline;
pub mod registry;

use async_trait::async_trait;

use crate::http::connection::ConnectionHandle;
use crate::http::request::Request;
use crate::http::response::Response;

pub use loader::{Extension, ExtensionContext, load_extensions};
pub use pipeline::HookOutcome;
pub use registry::HookRegistry;

pub type HookResult<T> = anyhow::Result<T>;

/// Named extension points, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeRequest,
    AfterRequest,
    WebsocketConnect,
    WebsocketMessage,
    WebsocketClose,
}

impl HookPoint {
    pub const ALL: [HookPoint; 5] = [
        HookPoint::BeforeRequest,
        HookPoint::AfterRequest,
        HookPoint::WebsocketConnect,
        HookPoint::WebsocketMessage,
        HookPoint::WebsocketClose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HookPoint::BeforeRequest => "before_request",
            HookPoint::AfterRequest => "after_request",
            HookPoint::WebsocketConnect => "websocket_connect",
            HookPoint::WebsocketMessage => "websocket_message",
            HookPoint::WebsocketClose => "websocket_close",
        }
    }
}

/// What the pipeline does after a `before_request` hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFlow {
    Continue,
    /// The hook answered on the connection itself. Remaining hooks are
    /// skipped and the pipeline writes nothing.
    Halt,
}

#[async_trait]
pub trait BeforeRequestHook: Send + Sync {
    async fn before_request(&self, request: &Request) -> HookResult<HookFlow>;
}

#[async_trait]
pub trait AfterRequestHook: Send + Sync {
    async fn after_request(&self, request: &Request, response: &mut Response) -> HookResult<()>;
}

#[async_trait]
pub trait WebsocketConnectHook: Send + Sync {
    async fn on_connect(&self, connection: &ConnectionHandle) -> HookResult<()>;
}

#[async_trait]
pub trait WebsocketMessageHook: Send + Sync {
    async fn on_message(&self, connection: &ConnectionHandle, message: &[u8]) -> HookResult<()>;
}

#[async_trait]
pub trait WebsocketCloseHook: Send + Sync {
    async fn on_close(&self, connection: &ConnectionHandle) -> HookResult<()>;
}
