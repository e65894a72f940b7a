use std::sync::{Arc, Mutex};

use anyhow::Result;
use kanal::{AsyncReceiver, AsyncSender};
use snaptext_types::AppEvent;
use snaptext_ui::{AppTray, MenuState, spawn_tray};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Tray lifecycle: spawn the icon, re-render on request, tear down on
/// cancellation. The menu content itself lives in the shared snapshot; an
/// empty update closure is enough to make ksni recompute it.
pub async fn ui_loop(
    menu: Arc<Mutex<MenuState>>,
    actions: AsyncSender<AppEvent>,
    render_rx: AsyncReceiver<()>,
    cancel: CancellationToken,
) -> Result<()> {
    let tray = AppTray::new(menu, actions.to_sync());
    let handle = spawn_tray(tray).await?;
    info!("tray icon created");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                handle.shutdown().await;
                break;
            }
            changed = render_rx.recv() => {
                changed?;
                handle.update(|_| {}).await;
            }
        }
    }
    Ok(())
}
