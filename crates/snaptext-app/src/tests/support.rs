use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use image::RgbaImage;
use snaptext_config::{KvStore, SettingsPatch, SettingsStore};
use snaptext_io::{ClipboardSink, NotificationSink};
use snaptext_ocr::{OcrError, RegionSelector, ScreenGrabber, TextRecognizer};
use snaptext_types::{CaptureRect, Language};

use crate::extract::ExtractionPipeline;
use crate::worker::{HotkeyHook, HotkeyListener};

pub struct FakeSelector(pub Option<CaptureRect>);

impl RegionSelector for FakeSelector {
    fn select_region(&self) -> Result<Option<CaptureRect>> {
        Ok(self.0)
    }
}

pub struct FakeGrabber;

impl ScreenGrabber for FakeGrabber {
    fn grab(&self, rect: CaptureRect) -> Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(
            rect.width,
            rect.height,
            image::Rgba([128, 128, 128, 255]),
        ))
    }
}

pub struct FakeRecognizer {
    pub text: String,
    pub missing: bool,
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, _image: &RgbaImage, _languages: &[Language]) -> Result<String, OcrError> {
        if self.missing {
            Err(OcrError::EngineMissing("no engine installed".into()))
        } else {
            Ok(self.text.clone())
        }
    }
}

#[derive(Default)]
pub struct FakeClipboard(pub Mutex<Vec<String>>);

impl ClipboardSink for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier(pub AtomicUsize);

impl NotificationSink for FakeNotifier {
    fn show(&self, _summary: &str, _body: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hook that counts live registrations and fires on demand.
pub struct FakeHook {
    pub live: Arc<AtomicUsize>,
    pub fire: Arc<AtomicBool>,
}

impl FakeHook {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicUsize::new(0)),
            fire: Arc::new(AtomicBool::new(false)),
        }
    }
}

struct FakeListener {
    live: Arc<AtomicUsize>,
    fire: Arc<AtomicBool>,
}

impl HotkeyListener for FakeListener {
    fn pressed(&self) -> bool {
        self.fire.swap(false, Ordering::SeqCst)
    }

    fn release(&self) {}
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl HotkeyHook for FakeHook {
    fn listen(&self, _spec: &str) -> Result<Box<dyn HotkeyListener>> {
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeListener {
            live: Arc::clone(&self.live),
            fire: Arc::clone(&self.fire),
        }))
    }
}

pub struct TestRig {
    pub dir: tempfile::TempDir,
    pub clipboard: Arc<FakeClipboard>,
    pub notifier: Arc<FakeNotifier>,
    pub pipeline: Arc<ExtractionPipeline>,
}

impl TestRig {
    pub fn fallback_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("ephemeral")
    }
}

/// Pipeline wired entirely to fakes, with settings seeded from `patch`.
pub fn rig(selection: Option<CaptureRect>, patch: SettingsPatch) -> TestRig {
    rig_with_recognizer(selection, patch, "extracted text", false)
}

pub fn rig_with_recognizer(
    selection: Option<CaptureRect>,
    patch: SettingsPatch,
    text: &str,
    missing: bool,
) -> TestRig {
    let dir = tempfile::tempdir().unwrap();
    let kv = KvStore::at(dir.path().join("settings.json"));
    SettingsStore::with_store(kv.clone()).set_values(patch);

    let clipboard = Arc::new(FakeClipboard::default());
    let notifier = Arc::new(FakeNotifier::default());
    let fallback_dir = dir.path().join("ephemeral");
    let pipeline = Arc::new(ExtractionPipeline {
        selector: Arc::new(FakeSelector(selection)),
        grabber: Arc::new(FakeGrabber),
        recognizer: Arc::new(FakeRecognizer {
            text: text.to_string(),
            missing,
        }),
        clipboard: clipboard.clone(),
        notifier: notifier.clone(),
        store: kv,
        fallback_dir,
    });

    TestRig {
        dir,
        clipboard,
        notifier,
        pipeline,
    }
}

pub fn some_rect() -> Option<CaptureRect> {
    Some(CaptureRect::from_corners((10, 10), (110, 90)))
}
