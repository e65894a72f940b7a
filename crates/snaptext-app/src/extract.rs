use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use snaptext_config::{KvStore, SettingsStore};
use snaptext_io::{ClipboardSink, NotificationSink};
use snaptext_ocr::{
    RegionSelector, ScreenGrabber, TextRecognizer, capture_to, discard, screenshot_path,
};
use tracing::{debug, info};

const NOTIFY_SUMMARY: &str = "Text extraction";
const NOTIFY_BODY: &str = "Text has been extracted from the selected area";

#[derive(Debug, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The selection window was dismissed without a drag.
    Cancelled,
    Done {
        chars: usize,
        saved: Option<PathBuf>,
    },
}

/// One hotkey activation, end to end: select, capture, recognize, copy.
///
/// All collaborators sit behind traits; the whole run is blocking and is
/// invoked from a `spawn_blocking` context. Settings are re-read from the
/// backing store on every run, which is how menu changes reach an already
/// running worker.
pub struct ExtractionPipeline {
    pub selector: Arc<dyn RegionSelector>,
    pub grabber: Arc<dyn ScreenGrabber>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub clipboard: Arc<dyn ClipboardSink>,
    pub notifier: Arc<dyn NotificationSink>,
    pub store: KvStore,
    pub fallback_dir: PathBuf,
}

impl ExtractionPipeline {
    pub fn run(&self) -> Result<ExtractionOutcome> {
        let settings = SettingsStore::with_store(self.store.clone())
            .settings()
            .clone();

        let Some(rect) = self.selector.select_region()? else {
            debug!("selection dismissed");
            return Ok(ExtractionOutcome::Cancelled);
        };

        let path = screenshot_path(
            settings.save_folder.as_deref(),
            settings.save_photos,
            &self.fallback_dir,
            None,
        )?;
        let shot = capture_to(self.grabber.as_ref(), rect, path)?;

        let saved = if settings.save_photos {
            Some(shot.path.clone())
        } else {
            discard(&shot.path);
            None
        };

        let text = self.recognizer.recognize(&shot.image, &settings.languages)?;
        self.clipboard.write_text(&text)?;
        info!(chars = text.chars().count(), "text copied to clipboard");

        if settings.notifications_enabled {
            self.notifier.show(NOTIFY_SUMMARY, NOTIFY_BODY);
        }

        Ok(ExtractionOutcome::Done {
            chars: text.chars().count(),
            saved,
        })
    }
}
