//! Mission Control sync runner
//!
//! Headless runner for the live-sync core: wires configuration, starts the
//! sync service against the configured backend, and logs snapshot
//! summaries and mode transitions until shutdown. A real dashboard front
//! end consumes the same store and watch channels this binary logs from.

use mission_control_sync::client::ApiClient;
use mission_control_sync::config::SyncConfig;
use mission_control_sync::state::ViewStore;
use mission_control_sync::sync::SyncService;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = SyncConfig::from_env();
    info!("Configuration loaded: {:?}", config);

    let client = ApiClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.fetch.status_timeout_secs),
    );
    let store = ViewStore::new();
    let mut service = SyncService::new(client, store.clone(), config);

    let mut revisions = store.subscribe();
    let mut mode = service.mode();
    let mut connectivity = service.connectivity();
    service.spawn();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Log whatever the view layer would re-render on.
    let summary_store = store.clone();
    let summary_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let revision = *revisions.borrow_and_update();
                    let snapshot = summary_store.snapshot().await;
                    info!(
                        revision = revision,
                        agents = snapshot.agents.len(),
                        tasks = snapshot.tasks.len(),
                        events = snapshot.events.len(),
                        "Store updated"
                    );
                }
                changed = mode.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = *mode.borrow_and_update();
                    info!(mode = ?current, "Sync mode changed");
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let connected = *connectivity.borrow_and_update();
                    info!(connected = connected, "Backend connectivity probe");
                }
            }
        }
    });

    shutdown_signal().await;

    summary_task.abort();
    service.shutdown();
    info!("Shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
