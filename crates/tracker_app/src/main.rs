use std::sync::Arc;

use anyhow::Context;
use tracker_app::{create_router, logging, AppConfig, AppState, ApplicationStore, SystemClipboard};
use tracker_engine::{ClipboardSource, ClipboardWatcher, DraftSlot, ScrapeOrchestrator, WatcherConfig};
use tracker_logging::{tracker_info, tracker_warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    logging::initialize(config.log_destination, config.level_filter()?);

    let store = ApplicationStore::open(&config.database_path)
        .with_context(|| format!("opening database {:?}", config.database_path))?;
    let drafts = DraftSlot::new();

    let watcher = if config.clipboard.enabled {
        let orchestrator = Arc::new(ScrapeOrchestrator::new(&config.scraping));
        let watcher = ClipboardWatcher::spawn(
            WatcherConfig::new(config.clipboard.poll_interval()),
            orchestrator,
            drafts.clone(),
            || Box::new(SystemClipboard::new()) as Box<dyn ClipboardSource>,
        )
        .context("starting clipboard watcher")?;
        Some(watcher)
    } else {
        tracker_info!("Clipboard monitoring disabled");
        None
    };

    let app = create_router().with_state(AppState::new(store, drafts));
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    tracker_info!("Job tracker listening on http://{}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(watcher) = watcher {
        tokio::task::spawn_blocking(move || watcher.stop())
            .await
            .context("joining clipboard watcher")?;
    }
    tracker_info!("Job tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracker_warn!("Could not listen for Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
}
