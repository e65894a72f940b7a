mod capture;
mod engine;
mod hotkey;
mod overlay;

pub use capture::{
    Screenshot, ScreenGrabber, RegionSelector, XcapGrabber, capture_to, discard,
    placeholder_image, screenshot_file_name, screenshot_path,
};
pub use engine::{
    OcrError, TesseractRecognizer, TextRecognizer, installed_languages, joined_languages,
};
pub use hotkey::{HotkeyRegistration, fold_tokens, parse_hotkey, poll_pressed, record_hotkey};
pub use overlay::{PointerEvent, SelectionOverlay, SelectionPhase};
