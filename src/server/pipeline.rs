use std::net::IpAddr;

use tracing::{debug, info};

use crate::access;
use crate::context::ServerContext;
use crate::error::ServeResult;
use crate::files::ResourceResolver;
use crate::hooks::HookFlow;
use crate::http::request::Request;
use crate::http::response::Response;

/// What the connection should do once the pipeline finishes.
#[derive(Debug)]
pub enum Outcome {
    Respond(Response),
    /// A `before_request` hook answered the request itself.
    Halted,
}

/// Runs a decoded request through access control, hooks and resolution.
///
/// Order: IP filter, `before_request` hooks, path resolution, resource
/// resolution, `after_request` hooks. Only internal failures come back as
/// `Err`; every client-facing error is already a response.
pub async fn process(ctx: &ServerContext, request: &Request, peer: IpAddr) -> ServeResult<Outcome> {
    if !access::is_allowed(&ctx.config, peer) {
        info!(%peer, path = %request.path, "Rejected by IP whitelist");
        return Ok(Outcome::Respond(Response::forbidden()));
    }

    if ctx.hooks.run_before_request(request).await == HookFlow::Halt {
        debug!(%peer, path = %request.path, "Request handled by hook");
        return Ok(Outcome::Halted);
    }

    let mut response = match resolve(ctx, request).await {
        Ok(response) => response,
        Err(err) if err.is_internal() => return Err(err),
        Err(err) => {
            debug!(%peer, path = %request.path, error = %err, "Request refused");
            Response::for_error(&err)
        }
    };

    ctx.hooks.run_after_request(request, &mut response).await;

    Ok(Outcome::Respond(response))
}

async fn resolve(ctx: &ServerContext, request: &Request) -> ServeResult<Response> {
    let target = ctx.web_root.resolve(&request.path)?;
    ResourceResolver::new(&ctx.web_root, &ctx.config)
        .resolve(&target, request)
        .await
}
