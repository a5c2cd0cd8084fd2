//! Built-in extension that logs every answered request.

use async_trait::async_trait;
use tracing::info;

use super::{AfterRequestHook, Extension, ExtensionContext, HookRegistry, HookResult};
use crate::http::request::Request;
use crate::http::response::Response;

pub struct AccessLog;

#[async_trait]
impl AfterRequestHook for AccessLog {
    async fn after_request(&self, request: &Request, response: &mut Response) -> HookResult<()> {
        let peer = request.connection.as_ref().map(|c| c.peer().to_string());
        info!(
            peer = peer.as_deref().unwrap_or("-"),
            method = %request.method,
            path = request.path_without_query(),
            status = response.status.as_u16(),
            bytes = response.body.len(),
            "Request served"
        );
        Ok(())
    }
}

impl Extension for AccessLog {
    fn name(&self) -> &str {
        "access_log"
    }

    fn register(&self, registry: &mut HookRegistry, _ctx: &ExtensionContext) -> anyhow::Result<()> {
        registry.on_after_request(AccessLog);
        Ok(())
    }
}
