use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use kanal::AsyncSender;
use snaptext_ocr::{HotkeyRegistration, OcrError, poll_pressed};
use snaptext_types::AppEvent;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::extract::{ExtractionOutcome, ExtractionPipeline};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const STOP_GRACE: Duration = Duration::from_millis(500);

/// A live hotkey registration that can be polled and released.
pub trait HotkeyListener: Send + Sync {
    /// Drain pending events, reporting whether the hotkey fired.
    fn pressed(&self) -> bool;
    /// Release the OS registration without waiting for the poll task.
    fn release(&self);
}

/// Creates hotkey registrations. One implementation talks to the OS; tests
/// substitute their own.
pub trait HotkeyHook: Send + Sync {
    fn listen(&self, spec: &str) -> Result<Box<dyn HotkeyListener>>;
}

/// OS-backed hook. The hotkey manager must stay on its creating thread, so
/// each registration gets a dedicated thread that registers and then parks
/// on a stop channel; dropping out of the park releases the registration.
pub struct GlobalHotkeyHook;

struct GlobalListener {
    id: u32,
    stop: kanal::Sender<()>,
}

impl HotkeyListener for GlobalListener {
    fn pressed(&self) -> bool {
        poll_pressed(self.id)
    }

    fn release(&self) {
        let _ = self.stop.try_send(());
    }
}

impl Drop for GlobalListener {
    fn drop(&mut self) {
        let _ = self.stop.try_send(());
    }
}

impl HotkeyHook for GlobalHotkeyHook {
    fn listen(&self, spec: &str) -> Result<Box<dyn HotkeyListener>> {
        let (stop_tx, stop_rx) = kanal::bounded::<()>(1);
        let (ready_tx, ready_rx) = kanal::bounded::<Result<u32>>(1);
        let spec = spec.to_string();

        thread::Builder::new()
            .name("hotkey-registration".into())
            .spawn(move || {
                let registration = match HotkeyRegistration::register(&spec) {
                    Ok(registration) => registration,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(registration.id()));
                // Park until released; the registration drops with the thread.
                let _ = stop_rx.recv();
                debug!(hotkey = %spec, "hotkey registration released");
            })
            .context("Failed to spawn hotkey registration thread")?;

        let id = ready_rx
            .recv()
            .context("hotkey registration thread died")??;
        info!(id, "hotkey registered");
        Ok(Box::new(GlobalListener { id, stop: stop_tx }))
    }
}

struct WorkerHandle {
    cancel: CancellationToken,
    listener: Arc<dyn HotkeyListener>,
    task: JoinHandle<()>,
}

/// Background hotkey listener driving the extraction pipeline.
///
/// At most one handle is live: `start` refuses while running, `stop` takes
/// the handle down and is a no-op otherwise, `restart` chains the two.
pub struct ExtractionWorker {
    hook: Arc<dyn HotkeyHook>,
    pipeline: Arc<ExtractionPipeline>,
    events: AsyncSender<AppEvent>,
    handle: Option<WorkerHandle>,
}

impl ExtractionWorker {
    pub fn new(
        hook: Arc<dyn HotkeyHook>,
        pipeline: Arc<ExtractionPipeline>,
        events: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            hook,
            pipeline,
            events,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, hotkey: &str) -> Result<()> {
        if self.handle.is_some() {
            bail!("extraction worker is already running");
        }
        let listener: Arc<dyn HotkeyListener> = Arc::from(self.hook.listen(hotkey)?);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(listen_loop(
            Arc::clone(&listener),
            cancel.clone(),
            Arc::clone(&self.pipeline),
            self.events.clone(),
        ));
        self.handle = Some(WorkerHandle {
            cancel,
            listener,
            task,
        });
        info!(hotkey, "extraction worker started");
        Ok(())
    }

    /// Cancel the poll task and release the registration. The registration
    /// is released up front so the hotkey is gone even while an extraction
    /// is still blocking the task past the grace period.
    pub async fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        handle.cancel.cancel();
        handle.listener.release();

        let mut task = handle.task;
        if timeout(STOP_GRACE, &mut task).await.is_err() {
            warn!("worker did not stop in time, aborting");
            task.abort();
            let _ = task.await;
        }
        drop(handle.listener);
        info!("extraction worker stopped");
    }

    pub async fn restart(&mut self, hotkey: &str) -> Result<()> {
        self.stop().await;
        self.start(hotkey)
    }
}

async fn listen_loop(
    listener: Arc<dyn HotkeyListener>,
    cancel: CancellationToken,
    pipeline: Arc<ExtractionPipeline>,
    events: AsyncSender<AppEvent>,
) {
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if listener.pressed() {
                    run_extraction(&pipeline, &events).await;
                    // Presses queued while extracting must not re-trigger.
                    let _ = listener.pressed();
                }
            }
        }
    }
    debug!("listen loop exited");
}

async fn run_extraction(pipeline: &Arc<ExtractionPipeline>, events: &AsyncSender<AppEvent>) {
    let pipeline = Arc::clone(pipeline);
    let outcome = tokio::task::spawn_blocking(move || pipeline.run()).await;
    match outcome {
        Ok(Ok(ExtractionOutcome::Done { chars, saved })) => {
            let _ = events.send(AppEvent::ExtractionComplete { chars, saved }).await;
        }
        Ok(Ok(ExtractionOutcome::Cancelled)) => {
            debug!("extraction cancelled by user");
        }
        Ok(Err(err)) => match err.downcast_ref::<OcrError>() {
            Some(OcrError::EngineMissing(msg)) => {
                let _ = events.send(AppEvent::OcrEngineMissing(msg.clone())).await;
            }
            _ => error!(%err, "extraction failed"),
        },
        Err(err) => error!(%err, "extraction task panicked"),
    }
}
