use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::config::Config;
use crate::error::{ServeError, ServeResult};
use crate::files::listing::render_listing;
use crate::files::path::{ResolvedPath, WebRoot};
use crate::http::form::{decode_form, render_form_echo};
use crate::http::mime::{self, content_type_for};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Request path that triggers the favicon shortcut.
pub const FAVICON_ROUTE: &str = "/favicon.ico";
pub const INDEX_FILE: &str = "index.html";

/// Decides how a contained, permitted request is answered.
///
/// Outcomes are tried in order: favicon shortcut, directory index,
/// directory listing (or 403), 404, then method dispatch on the file.
pub struct ResourceResolver<'a> {
    web_root: &'a WebRoot,
    config: &'a Config,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(web_root: &'a WebRoot, config: &'a Config) -> Self {
        Self { web_root, config }
    }

    pub async fn resolve(&self, target: &ResolvedPath, request: &Request) -> ServeResult<Response> {
        if let Some(response) = self.favicon(request).await? {
            return Ok(response);
        }

        let mut path = target.absolute.clone();

        if is_dir(&path).await {
            let index = path.join(INDEX_FILE);
            if is_file(&index).await {
                path = index;
            } else {
                return self.listing(target).await;
            }
        }

        if !is_file(&path).await {
            return Err(ServeError::NotFound(target.route()));
        }

        let path = self.web_root.contain(&path).await?;
        self.dispatch(&path, request).await
    }

    /// Serves the configured favicon for `/favicon.ico`. Any miss along the
    /// way falls through to normal resolution.
    async fn favicon(&self, request: &Request) -> ServeResult<Option<Response>> {
        if request.path != FAVICON_ROUTE {
            return Ok(None);
        }
        let Some(favicon) = self.config.favicon.as_deref().filter(|f| !f.is_empty()) else {
            return Ok(None);
        };
        let Ok(resolved) = self.web_root.resolve(favicon) else {
            debug!(favicon, "Configured favicon escapes web root");
            return Ok(None);
        };
        if !is_file(&resolved.absolute).await {
            return Ok(None);
        }
        let Ok(path) = self.web_root.contain(&resolved.absolute).await else {
            return Ok(None);
        };

        let body = fs::read(&path).await?;
        Ok(Some(
            ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", mime::FAVICON)
                .body(body)
                .build(),
        ))
    }

    async fn listing(&self, target: &ResolvedPath) -> ServeResult<Response> {
        // Containment first, so a link out of the root reads as missing
        let dir = self.web_root.contain(&target.absolute).await?;
        let route = target.route();
        if !self.config.is_browsable(&route) {
            return Err(ServeError::Forbidden(route));
        }
        let body = render_listing(&dir, &route).await?;
        Ok(Response::html(body))
    }

    async fn dispatch(&self, path: &Path, request: &Request) -> ServeResult<Response> {
        match request.method {
            Method::GET => {
                let body = fs::read(path).await?;
                Ok(ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", content_type_for(path))
                    .header("Content-Length", body.len().to_string())
                    .body(body)
                    .build())
            }
            // POST echoes the submitted form and never touches the target
            Method::POST => {
                let fields = decode_form(&request.body);
                Ok(Response::html(render_form_echo(&fields)))
            }
            _ => Ok(Response::bad_request()),
        }
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
