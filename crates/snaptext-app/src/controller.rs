use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaptext_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::extract::ExtractionPipeline;
use crate::state::AppState;
use crate::ui::ui_loop;
use crate::worker::{ExtractionWorker, HotkeyHook};

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub render: (AsyncSender<()>, AsyncReceiver<()>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64), // menu actions + worker results
            render: kanal::bounded_async(16), // tray re-render requests
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(
        &self,
        hook: Arc<dyn HotkeyHook>,
        pipeline: Arc<ExtractionPipeline>,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        let worker = ExtractionWorker::new(hook, pipeline, self.channels.events.0.clone());

        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.events.1.clone(),
            self.channels.render.0.clone(),
            worker,
            self.cancel_token.clone(),
        ));

        tasks.spawn(ui_loop(
            self.state.menu.clone(),
            self.channels.events.0.clone(),
            self.channels.render.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.cancel_token.cancelled()
    }
}
