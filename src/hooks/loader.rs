use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use super::HookRegistry;
use crate::cache::Cache;

/// What an extension may use while registering its hooks.
#[derive(Clone)]
pub struct ExtensionContext {
    pub cache: Arc<Cache>,
    pub web_root: PathBuf,
}

/// A unit of extension code. How extensions are discovered is up to the
/// caller; the loader only registers them in the order given.
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn register(&self, registry: &mut HookRegistry, ctx: &ExtensionContext) -> anyhow::Result<()>;
}

/// Builds the hook registry from `extensions`, in order.
///
/// Each extension registers into its own scratch registry, which is merged
/// only on success, so an extension that fails contributes no hooks. The
/// failure is logged and loading continues.
pub fn load_extensions(
    extensions: Vec<Box<dyn Extension>>,
    ctx: &ExtensionContext,
) -> HookRegistry {
    let mut registry = HookRegistry::new();

    for extension in extensions {
        let mut scratch = HookRegistry::new();
        match extension.register(&mut scratch, ctx) {
            Ok(()) => {
                registry.extend(scratch);
                info!(extension = extension.name(), "Loaded extension");
            }
            Err(e) => {
                error!(extension = extension.name(), error = ?e, "Failed to load extension");
            }
        }
    }

    registry
}
