//! `WorldExtension` Engine - Main Entry Point
//!
//! Loads the whitelist CSV, resolves the configured local viewer, and keeps
//! the role projections fresh until shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use we_common::Role;
use we_engine::broadcast::{DisplaySink, FlagTarget, RoleBroadcaster};
use we_engine::config::Config;
use we_engine::loader::{HttpFetcher, TableLoader};
use we_engine::permissions::BypassList;
use we_engine::session::PermissionSession;

/// Text sink that surfaces projections through the log.
struct LogSink {
    label: &'static str,
}

impl DisplaySink for LogSink {
    fn set_text(&self, text: &str) {
        info!(sink = self.label, text, "projection updated");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "we_engine=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        url = %config.permissions_url,
        "Starting WorldExtension engine"
    );

    // Log-backed effect target per role group.
    let mut broadcaster = RoleBroadcaster::new();
    for role in Role::DESCENDING {
        broadcaster.register(role, vec![Some(Arc::new(FlagTarget::new(role.label())))]);
    }

    let session = PermissionSession::new(
        TableLoader::new(HttpFetcher::new(), config.permissions_url.clone()),
        BypassList::new(config.bypass_users.clone()),
        config.local_username.clone(),
        config.max_patrons,
        broadcaster,
    )
    .with_display(Arc::new(LogSink {
        label: "permission-display",
    }))
    .with_roster_sinks(
        Arc::new(LogSink { label: "patron1" }),
        Arc::new(LogSink { label: "patron2" }),
    );

    // Initial load. A transport failure is an operator concern, not fatal:
    // the engine keeps running and retries on the reload interval.
    if let Err(e) = session.load_and_refresh().await {
        error!(%e, "initial whitelist load failed");
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    if let Some(secs) = config.reload_interval_secs {
        let mut interval = tokio::time::interval(Duration::from_secs(secs));
        interval.tick().await; // first tick fires immediately
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = session.load_and_refresh().await {
                        error!(%e, "whitelist reload failed");
                    }
                }
                _ = &mut shutdown => break,
            }
        }
    } else {
        shutdown.await?;
    }

    info!("Engine shutdown complete");
    Ok(())
}
