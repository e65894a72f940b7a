use std::path::PathBuf;

use serde_json::{Value, json};
use snaptext_types::{Language, LogoTheme, Theme};
use tracing::debug;

use crate::store::KvStore;

pub const APP_TITLE: &str = "Snaptext";

const KEY_THEME: &str = "theme";
const KEY_LOGO: &str = "logo";
const KEY_NOTIFICATIONS: &str = "notifications";
const KEY_SAVE_PHOTOS: &str = "save_photos";
const KEY_SAVE_FOLDER: &str = "save_folder";
const KEY_LANGUAGES: &str = "languages";
const KEY_HOTKEY: &str = "hotkey";

/// The persisted application settings, fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub logo_theme: LogoTheme,
    pub notifications_enabled: bool,
    pub save_photos: bool,
    pub save_folder: Option<PathBuf>,
    pub languages: Vec<Language>,
    pub hotkey: String,
}

impl Settings {
    pub fn defaults() -> Self {
        Self {
            theme: detect_theme(),
            logo_theme: LogoTheme::Default,
            notifications_enabled: false,
            save_photos: false,
            save_folder: None,
            languages: vec![Language::English, Language::OrientationScript],
            hotkey: "shift+alt+a".to_string(),
        }
    }

    /// The icon variant to display, with `Default` following the display theme.
    pub fn resolved_logo(&self) -> Theme {
        match self.logo_theme {
            LogoTheme::Dark => Theme::Dark,
            LogoTheme::Light => Theme::Light,
            LogoTheme::Default => self.theme,
        }
    }
}

fn detect_theme() -> Theme {
    match dark_light::detect() {
        dark_light::Mode::Dark => Theme::Dark,
        _ => Theme::Light,
    }
}

/// A partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub logo_theme: Option<LogoTheme>,
    pub notifications_enabled: Option<bool>,
    pub save_photos: Option<bool>,
    pub save_folder: Option<PathBuf>,
    pub languages: Option<Vec<Language>>,
    pub hotkey: Option<String>,
}

/// Settings persisted through a [`KvStore`], loaded eagerly on open.
///
/// Missing or unparseable fields fall back to their documented defaults,
/// so a loaded record is always complete.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    kv: KvStore,
    current: Settings,
}

impl SettingsStore {
    pub fn open() -> Self {
        Self::with_store(KvStore::scoped("settings"))
    }

    pub fn with_store(kv: KvStore) -> Self {
        let mut store = Self {
            kv,
            current: Settings::defaults(),
        };
        store.load();
        store
    }

    pub fn settings(&self) -> &Settings {
        &self.current
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Re-read the backing store into memory.
    pub fn load(&mut self) -> &Settings {
        self.current = load_from(&self.kv);
        &self.current
    }

    /// Apply a partial update, persist the merged record, then re-read it.
    pub fn set_values(&mut self, patch: SettingsPatch) -> &Settings {
        let mut merged = self.current.clone();
        if let Some(theme) = patch.theme {
            merged.theme = theme;
        }
        if let Some(logo) = patch.logo_theme {
            merged.logo_theme = logo;
        }
        if let Some(on) = patch.notifications_enabled {
            merged.notifications_enabled = on;
        }
        if let Some(on) = patch.save_photos {
            merged.save_photos = on;
        }
        if let Some(folder) = patch.save_folder {
            merged.save_folder = Some(folder);
        }
        if let Some(languages) = patch.languages {
            merged.languages = languages;
        }
        if let Some(hotkey) = patch.hotkey {
            merged.hotkey = hotkey;
        }
        self.kv.set_many(to_entries(&merged));
        debug!("settings persisted");
        self.load()
    }

    /// Drop every stored value; the next load yields pure defaults.
    pub fn clear(&mut self) -> &Settings {
        self.kv.clear();
        self.load()
    }
}

/// Read a full settings record from a store, defaults filling any gap.
pub(crate) fn load_from(kv: &KvStore) -> Settings {
    let map = kv.read_map();
    let defaults = Settings::defaults();
    let field = |key: &str| map.get(key).cloned();

    Settings {
        theme: field(KEY_THEME)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(defaults.theme),
        logo_theme: field(KEY_LOGO)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(defaults.logo_theme),
        notifications_enabled: field(KEY_NOTIFICATIONS)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.notifications_enabled),
        save_photos: field(KEY_SAVE_PHOTOS)
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.save_photos),
        save_folder: field(KEY_SAVE_FOLDER)
            .and_then(|v| v.as_str().map(PathBuf::from)),
        languages: field(KEY_LANGUAGES)
            .and_then(parse_languages)
            .unwrap_or(defaults.languages),
        hotkey: field(KEY_HOTKEY)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or(defaults.hotkey),
    }
}

fn parse_languages(value: Value) -> Option<Vec<Language>> {
    let codes = value.as_array()?;
    let mut languages = Vec::new();
    for code in codes {
        let lang = Language::from_code(code.as_str()?)?;
        if !languages.contains(&lang) {
            languages.push(lang);
        }
    }
    if languages.is_empty() { None } else { Some(languages) }
}

fn to_entries(settings: &Settings) -> Vec<(String, Value)> {
    let codes: Vec<&str> = settings.languages.iter().map(Language::code).collect();
    vec![
        (KEY_THEME.into(), json!(settings.theme)),
        (KEY_LOGO.into(), json!(settings.logo_theme)),
        (KEY_NOTIFICATIONS.into(), json!(settings.notifications_enabled)),
        (KEY_SAVE_PHOTOS.into(), json!(settings.save_photos)),
        (
            KEY_SAVE_FOLDER.into(),
            match &settings.save_folder {
                Some(path) => json!(path.to_string_lossy()),
                None => Value::Null,
            },
        ),
        (KEY_LANGUAGES.into(), json!(codes)),
        (KEY_HOTKEY.into(), json!(settings.hotkey)),
    ]
}
