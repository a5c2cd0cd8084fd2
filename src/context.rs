use crate::config::Config;
use crate::files::WebRoot;
use crate::hooks::HookRegistry;

/// Process-wide state built once at startup and shared by every
/// connection. Nothing in it changes while the server runs.
#[derive(Debug)]
pub struct ServerContext {
    pub config: Config,
    pub web_root: WebRoot,
    pub hooks: HookRegistry,
}

impl ServerContext {
    pub fn new(config: Config, web_root: WebRoot, hooks: HookRegistry) -> Self {
        Self {
            config,
            web_root,
            hooks,
        }
    }
}
