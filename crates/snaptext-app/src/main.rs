use std::sync::Arc;

use snaptext_config::{APP_TITLE, SettingsStore, StartupRegistry};
use snaptext_io::{DesktopNotifier, SystemClipboard, show_error_blocking};
use snaptext_ocr::{TesseractRecognizer, XcapGrabber, installed_languages};
use snaptext_ui::EframeSelector;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod extract;
mod state;
mod ui;
mod worker;

#[cfg(test)]
mod tests;

use controller::AppController;
use extract::ExtractionPipeline;
use state::AppState;
use worker::GlobalHotkeyHook;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Without a working recognition engine the whole tool is pointless;
    // say so up front instead of failing on the first hotkey press.
    if let Err(err) = TesseractRecognizer::probe() {
        tracing::error!(%err, "OCR engine probe failed");
        show_error_blocking(
            APP_TITLE,
            &format!("Text recognition engine is not available.\n{err}"),
        );
        std::process::exit(1);
    }

    let store = SettingsStore::open();
    let state = Arc::new(AppState::new(
        store,
        StartupRegistry::open(),
        installed_languages(),
    ));

    let settings_kv = state.store.lock().await.kv().clone();
    let pipeline = Arc::new(ExtractionPipeline {
        selector: Arc::new(EframeSelector),
        grabber: Arc::new(XcapGrabber),
        recognizer: Arc::new(TesseractRecognizer),
        clipboard: Arc::new(SystemClipboard),
        notifier: Arc::new(DesktopNotifier),
        store: settings_kv,
        fallback_dir: std::env::temp_dir().join("snaptext"),
    });

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(Arc::new(GlobalHotkeyHook), pipeline);

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::error!(%err, "failed to listen for ctrl+c");
            }
            tracing::info!("shutdown requested");
        }
        _ = controller.cancelled() => {
            tracing::info!("quit from tray");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("task exited"),
                Ok(Err(err)) => tracing::error!(%err, "task failed"),
                Err(err) => tracing::error!(%err, "task panicked"),
            }
        }
    }

    controller.shutdown();
    while tasks.join_next().await.is_some() {}
}
