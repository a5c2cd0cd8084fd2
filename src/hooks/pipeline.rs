use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::{error, warn};

use super::{HookFlow, HookPoint, HookRegistry, HookResult};
use crate::http::connection::{ConnectionHandle, panic_message};
use crate::http::request::Request;
use crate::http::response::Response;

/// Result of invoking a single callback. Failures never leave the
/// invocation: they are logged and reported here instead.
#[derive(Debug)]
pub enum HookOutcome<T> {
    Completed(T),
    Failed(anyhow::Error),
    Panicked(String),
}

impl<T> HookOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            HookOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// Runs one callback, converting errors and panics into an outcome.
pub async fn invoke<T, F>(point: HookPoint, index: usize, call: F) -> HookOutcome<T>
where
    F: Future<Output = HookResult<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(value)) => HookOutcome::Completed(value),
        Ok(Err(err)) => {
            warn!(hook = point.name(), index, error = %err, "Hook failed");
            HookOutcome::Failed(err)
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref()).to_string();
            error!(hook = point.name(), index, panic = %message, "Hook panicked");
            HookOutcome::Panicked(message)
        }
    }
}

impl HookRegistry {
    /// Runs `before_request` callbacks in order until one halts.
    pub async fn run_before_request(&self, request: &Request) -> HookFlow {
        for (index, hook) in self.before_request.iter().enumerate() {
            let outcome = invoke(HookPoint::BeforeRequest, index, hook.before_request(request)).await;
            if let HookOutcome::Completed(HookFlow::Halt) = outcome {
                return HookFlow::Halt;
            }
        }
        HookFlow::Continue
    }

    /// Runs `after_request` callbacks in order. A callback that fails has
    /// its partial changes to `response` rolled back.
    pub async fn run_after_request(&self, request: &Request, response: &mut Response) {
        for (index, hook) in self.after_request.iter().enumerate() {
            let snapshot = response.clone();
            let outcome = invoke(
                HookPoint::AfterRequest,
                index,
                hook.after_request(request, response),
            )
            .await;
            if outcome.completed().is_none() {
                *response = snapshot;
            }
        }
    }

    pub async fn run_websocket_connect(&self, connection: &ConnectionHandle) {
        for (index, hook) in self.websocket_connect.iter().enumerate() {
            invoke(HookPoint::WebsocketConnect, index, hook.on_connect(connection)).await;
        }
    }

    pub async fn run_websocket_message(&self, connection: &ConnectionHandle, message: &[u8]) {
        for (index, hook) in self.websocket_message.iter().enumerate() {
            invoke(
                HookPoint::WebsocketMessage,
                index,
                hook.on_message(connection, message),
            )
            .await;
        }
    }

    pub async fn run_websocket_close(&self, connection: &ConnectionHandle) {
        for (index, hook) in self.websocket_close.iter().enumerate() {
            invoke(HookPoint::WebsocketClose, index, hook.on_close(connection)).await;
        }
    }
}
