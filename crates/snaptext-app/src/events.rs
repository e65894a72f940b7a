use std::sync::Arc;

use anyhow::Result;
use kanal::{AsyncReceiver, AsyncSender};
use snaptext_config::{APP_TITLE, SettingsPatch};
use snaptext_io::{pick_folder, show_error_blocking};
use snaptext_ocr::{parse_hotkey, record_hotkey};
use snaptext_types::{AppEvent, Language, LogoTheme, MenuAction, Theme};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::state::AppState;
use crate::worker::ExtractionWorker;

/// Main loop: applies menu actions to the settings store, keeps the worker
/// registration in sync and pushes re-renders to the tray.
pub async fn event_loop(
    state: Arc<AppState>,
    rx: AsyncReceiver<AppEvent>,
    render_tx: AsyncSender<()>,
    mut worker: ExtractionWorker,
    cancel: CancellationToken,
) -> Result<()> {
    let initial_hotkey = state.store.lock().await.settings().hotkey.clone();
    if let Err(err) = worker.start(&initial_hotkey) {
        error!(%err, hotkey = %initial_hotkey, "cannot start hotkey listener");
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = rx.recv() => event?,
        };
        match event {
            AppEvent::Menu(MenuAction::Quit) => {
                info!("quit requested");
                worker.stop().await;
                cancel.cancel();
                break;
            }
            AppEvent::Menu(action) => {
                handle_action(&state, &mut worker, action).await;
                sync_menu(&state, &render_tx).await;
            }
            AppEvent::ExtractionComplete { chars, saved } => {
                info!(chars, ?saved, "extraction finished");
            }
            AppEvent::OcrEngineMissing(msg) => {
                error!(%msg, "OCR engine missing, stopping worker");
                worker.stop().await;
                let detail = msg.clone();
                let _ = tokio::task::spawn_blocking(move || {
                    show_error_blocking(
                        APP_TITLE,
                        &format!("Text recognition engine is not available.\n{detail}"),
                    );
                })
                .await;
            }
        }
    }

    worker.stop().await;
    Ok(())
}

async fn handle_action(state: &Arc<AppState>, worker: &mut ExtractionWorker, action: MenuAction) {
    match action {
        MenuAction::ChangeHotkey => change_hotkey(state, worker).await,
        MenuAction::ToggleNotifications => {
            let mut store = state.store.lock().await;
            let enabled = store.settings().notifications_enabled;
            store.set_values(SettingsPatch {
                notifications_enabled: Some(!enabled),
                ..Default::default()
            });
        }
        MenuAction::ToggleAutostart => {
            let enable = !state.registry.is_auto_started();
            state.registry.auto_start(enable);
        }
        MenuAction::ToggleSavePhotos => {
            let mut store = state.store.lock().await;
            let saving = store.settings().save_photos;
            store.set_values(SettingsPatch {
                save_photos: Some(!saving),
                ..Default::default()
            });
        }
        MenuAction::ChooseSaveFolder => choose_save_folder(state).await,
        MenuAction::ToggleLanguage(language) => toggle_language(state, worker, language).await,
        MenuAction::SelectTheme(theme) => select_theme(state, theme).await,
        MenuAction::SelectLogoTheme(logo) => select_logo(state, logo).await,
        MenuAction::Quit => unreachable!("handled by the event loop"),
    }
}

async fn change_hotkey(state: &Arc<AppState>, worker: &mut ExtractionWorker) {
    let recorded = match tokio::task::spawn_blocking(record_hotkey).await {
        Ok(Ok(recorded)) => recorded,
        Ok(Err(err)) => {
            error!(%err, "hotkey recording failed");
            return;
        }
        Err(err) => {
            error!(%err, "hotkey recording panicked");
            return;
        }
    };
    if let Err(err) = parse_hotkey(&recorded) {
        warn!(%err, recorded, "recorded combination is not registrable, keeping previous");
        return;
    }

    let hotkey = {
        let mut store = state.store.lock().await;
        store
            .set_values(SettingsPatch {
                hotkey: Some(recorded),
                ..Default::default()
            })
            .hotkey
            .clone()
    };
    if let Err(err) = worker.restart(&hotkey).await {
        error!(%err, hotkey, "cannot restart worker with new hotkey");
    }
}

async fn choose_save_folder(state: &Arc<AppState>) {
    let picked = tokio::task::spawn_blocking(|| pick_folder("Choose save folder")).await;
    match picked {
        Ok(Some(folder)) => {
            let mut store = state.store.lock().await;
            store.set_values(SettingsPatch {
                save_folder: Some(folder),
                ..Default::default()
            });
        }
        Ok(None) => info!("folder selection cancelled"),
        Err(err) => error!(%err, "folder dialog panicked"),
    }
}

async fn toggle_language(
    state: &Arc<AppState>,
    worker: &mut ExtractionWorker,
    language: Language,
) {
    let hotkey = {
        let mut store = state.store.lock().await;
        let mut languages = store.settings().languages.clone();
        if let Some(pos) = languages.iter().position(|l| *l == language) {
            // The recognizer needs at least one language.
            if languages.len() == 1 {
                warn!(code = language.code(), "refusing to remove the last language");
                return;
            }
            languages.remove(pos);
        } else {
            languages.push(language);
        }
        store
            .set_values(SettingsPatch {
                languages: Some(languages),
                ..Default::default()
            })
            .hotkey
            .clone()
    };
    if let Err(err) = worker.restart(&hotkey).await {
        error!(%err, "cannot restart worker after language change");
    }
}

async fn select_theme(state: &Arc<AppState>, theme: Theme) {
    let mut store = state.store.lock().await;
    store.set_values(SettingsPatch {
        theme: Some(theme),
        ..Default::default()
    });
}

async fn select_logo(state: &Arc<AppState>, logo: LogoTheme) {
    let mut store = state.store.lock().await;
    store.set_values(SettingsPatch {
        logo_theme: Some(logo),
        ..Default::default()
    });
}

/// Refresh the tray's menu snapshot and request a re-render. A full render
/// already pending makes the channel push redundant, hence try_send.
async fn sync_menu(state: &Arc<AppState>, render_tx: &AsyncSender<()>) {
    let settings = state.store.lock().await.settings().clone();
    let auto_started = state.registry.is_auto_started();
    if let Ok(mut menu) = state.menu.lock() {
        menu.settings = settings;
        menu.auto_started = auto_started;
    }
    let _ = render_tx.try_send(());
}
