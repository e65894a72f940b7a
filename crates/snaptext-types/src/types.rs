use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Screen-space rectangle in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRect {
    /// Build a normalized rectangle from two corner points, in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let x = a.0.min(b.0);
        let y = a.1.min(b.1);
        let width = a.0.abs_diff(b.0);
        let height = a.1.abs_diff(b.1);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

/// Tray icon variant. `Default` resolves through the display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoTheme {
    Dark,
    Light,
    Default,
}

impl LogoTheme {
    pub const ALL: [LogoTheme; 3] = [LogoTheme::Dark, LogoTheme::Light, LogoTheme::Default];

    pub fn label(&self) -> &'static str {
        match self {
            LogoTheme::Dark => "Dark",
            LogoTheme::Light => "Light",
            LogoTheme::Default => "Default",
        }
    }
}

/// OCR languages offered in the tray menu, identified by their engine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
    Ukrainian,
    German,
    French,
    Spanish,
    /// Orientation and script detection module.
    OrientationScript,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Russian,
        Language::Ukrainian,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::OrientationScript,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::Russian => "rus",
            Language::Ukrainian => "ukr",
            Language::German => "deu",
            Language::French => "fra",
            Language::Spanish => "spa",
            Language::OrientationScript => "osd",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Russian",
            Language::Ukrainian => "Ukrainian",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::OrientationScript => "Orientation",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

/// A user interaction routed from the tray menu to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChangeHotkey,
    ToggleNotifications,
    ToggleAutostart,
    ToggleSavePhotos,
    ChooseSaveFolder,
    ToggleLanguage(Language),
    SelectTheme(Theme),
    SelectLogoTheme(LogoTheme),
    Quit,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Menu(MenuAction),
    ExtractionComplete { chars: usize, saved: Option<PathBuf> },
    OcrEngineMissing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_order_independent() {
        let a = (120, 340);
        let b = (40, 80);
        assert_eq!(
            CaptureRect::from_corners(a, b),
            CaptureRect::from_corners(b, a)
        );
        let rect = CaptureRect::from_corners(a, b);
        assert_eq!(rect.x, 40);
        assert_eq!(rect.y, 80);
        assert_eq!(rect.width, 80);
        assert_eq!(rect.height, 260);
    }

    #[test]
    fn zero_area_rect_is_empty() {
        let rect = CaptureRect::from_corners((10, 10), (10, 10));
        assert!(rect.is_empty());
        let line = CaptureRect::from_corners((10, 10), (10, 50));
        assert!(line.is_empty());
    }

    #[test]
    fn language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("jpn"), None);
    }
}
