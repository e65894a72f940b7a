use image::{DynamicImage, RgbaImage};
use snaptext_types::Language;
use tesseract::Tesseract;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The OCR engine or its language data is not installed.
    #[error("OCR engine unavailable: {0}")]
    EngineMissing(String),
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Turns a captured bitmap into plain text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &RgbaImage, languages: &[Language]) -> Result<String, OcrError>;
}

/// `+`-joined engine codes, e.g. `eng+osd`.
pub fn joined_languages(languages: &[Language]) -> String {
    languages
        .iter()
        .map(Language::code)
        .collect::<Vec<_>>()
        .join("+")
}

/// Recognizer backed by a locally installed tesseract.
pub struct TesseractRecognizer;

impl TesseractRecognizer {
    /// Check that the engine can be initialized at all.
    pub fn probe() -> Result<(), OcrError> {
        Tesseract::new(None, Some(Language::English.code()))
            .map(|_| ())
            .map_err(|err| OcrError::EngineMissing(err.to_string()))
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &RgbaImage, languages: &[Language]) -> Result<String, OcrError> {
        let joined = joined_languages(languages);
        debug!(languages = %joined, "running recognition");

        let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
        let width = rgb.width() as i32;
        let height = rgb.height() as i32;
        let bytes_per_line = width * 3;

        let text = Tesseract::new(None, Some(&joined))
            .map_err(|err| OcrError::EngineMissing(err.to_string()))?
            .set_frame(rgb.as_raw(), width, height, 3, bytes_per_line)
            .map_err(|err| OcrError::Recognition(err.to_string()))?
            .get_text()
            .map_err(|err| OcrError::Recognition(err.to_string()))?;

        Ok(text.trim_end().to_string())
    }
}

/// The subset of offered languages the installed engine can actually load.
/// Without a working engine the full set is offered so the menu stays usable.
pub fn installed_languages() -> Vec<Language> {
    let available: Vec<Language> = Language::ALL
        .into_iter()
        .filter(|lang| Tesseract::new(None, Some(lang.code())).is_ok())
        .collect();
    if available.is_empty() {
        Language::ALL.to_vec()
    } else {
        available
    }
}
