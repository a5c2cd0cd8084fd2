use std::backtrace::Backtrace;
use std::sync::Arc;

use lynx::cache::Cache;
use lynx::config::{Config, ServerPaths};
use lynx::context::ServerContext;
use lynx::files::WebRoot;
use lynx::hooks::access_log::AccessLog;
use lynx::hooks::{Extension, ExtensionContext, load_extensions};
use lynx::server::Listener;

fn builtin_extensions() -> Vec<Box<dyn Extension>> {
    vec![Box::new(AccessLog)]
}

/// Logs every panic with a backtrace captured where it happened. Connections
/// and hooks catch the unwind themselves, so this only adds the trace.
fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!(panic = %info, %backtrace, "Panic");
    }));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();
    install_panic_logger();

    let paths = ServerPaths::from_env();
    let cfg = Config::load(&paths.config_file)?;
    let cache = Arc::new(Cache::open(&paths.cache_file).await?);
    let web_root = WebRoot::create(&paths.web_root)?;

    let ext_ctx = ExtensionContext {
        cache: cache.clone(),
        web_root: web_root.path().to_path_buf(),
    };
    let hooks = load_extensions(builtin_extensions(), &ext_ctx);

    let ctx = Arc::new(ServerContext::new(cfg, web_root, hooks));
    let listener = Listener::bind(ctx).await?;

    tokio::select! {
        res = listener.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    cache.save().await?;
    Ok(())
}
