use snaptext_config::{APP_TITLE, Settings};
use snaptext_types::{Language, LogoTheme, Theme};

/// Everything the menu depends on, snapshotted at render time.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub settings: Settings,
    pub auto_started: bool,
    pub languages_offered: Vec<Language>,
}

/// A checkable entry (language membership).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleEntry<T> {
    pub value: T,
    pub label: String,
    pub selected: bool,
}

/// A pick-one entry. The active option is hidden rather than checked,
/// so each submenu offers only the alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry<T> {
    pub value: T,
    pub label: String,
    pub visible: bool,
}

/// The fully computed menu. Pure data, recomputed from a [`MenuState`]
/// snapshot on every render; nothing here is mutated in place.
#[derive(Debug, Clone)]
pub struct MenuModel {
    pub title: String,
    pub hotkey_label: String,
    pub notifications_label: String,
    pub autostart_label: String,
    pub save_label: String,
    pub show_save_folder: bool,
    pub languages: Vec<ToggleEntry<Language>>,
    pub theme_options: Vec<OptionEntry<Theme>>,
    pub logo_options: Vec<OptionEntry<LogoTheme>>,
}

impl MenuModel {
    pub fn compute(state: &MenuState) -> Self {
        let s = &state.settings;
        Self {
            title: APP_TITLE.to_string(),
            hotkey_label: format!("HotKey {}", s.hotkey),
            notifications_label: if s.notifications_enabled {
                "Disable notifications".to_string()
            } else {
                "Enable notifications".to_string()
            },
            autostart_label: if state.auto_started {
                "Disable autostart".to_string()
            } else {
                "Enable autostart".to_string()
            },
            save_label: if s.save_photos {
                "Don't save screenshots".to_string()
            } else {
                "Save screenshots".to_string()
            },
            show_save_folder: s.save_photos,
            languages: state
                .languages_offered
                .iter()
                .map(|lang| ToggleEntry {
                    value: *lang,
                    label: lang.label().to_string(),
                    selected: s.languages.contains(lang),
                })
                .collect(),
            theme_options: Theme::ALL
                .into_iter()
                .map(|theme| OptionEntry {
                    value: theme,
                    label: theme.label().to_string(),
                    visible: theme != s.theme,
                })
                .collect(),
            logo_options: LogoTheme::ALL
                .into_iter()
                .map(|logo| OptionEntry {
                    value: logo,
                    label: logo.label().to_string(),
                    visible: logo != s.logo_theme,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> MenuState {
        MenuState {
            settings: Settings::defaults(),
            auto_started: false,
            languages_offered: Language::ALL.to_vec(),
        }
    }

    #[test]
    fn exactly_one_option_hidden_per_submenu() {
        let model = MenuModel::compute(&state());
        assert_eq!(model.theme_options.iter().filter(|o| !o.visible).count(), 1);
        assert_eq!(model.logo_options.iter().filter(|o| !o.visible).count(), 1);

        let hidden = model.logo_options.iter().find(|o| !o.visible).unwrap();
        assert_eq!(hidden.value, LogoTheme::Default);
    }

    #[test]
    fn labels_invert_with_current_value() {
        let mut s = state();
        let off = MenuModel::compute(&s);
        assert_eq!(off.notifications_label, "Enable notifications");
        assert_eq!(off.save_label, "Save screenshots");
        assert_eq!(off.autostart_label, "Enable autostart");
        assert!(!off.show_save_folder);

        s.settings.notifications_enabled = true;
        s.settings.save_photos = true;
        s.auto_started = true;
        let on = MenuModel::compute(&s);
        assert_eq!(on.notifications_label, "Disable notifications");
        assert_eq!(on.save_label, "Don't save screenshots");
        assert_eq!(on.autostart_label, "Disable autostart");
        assert!(on.show_save_folder);
    }

    #[test]
    fn hotkey_label_echoes_combination() {
        let mut s = state();
        s.settings.hotkey = "ctrl+f2".to_string();
        let model = MenuModel::compute(&s);
        assert_eq!(model.hotkey_label, "HotKey ctrl+f2");
    }

    #[test]
    fn language_entries_track_membership_and_offer() {
        let mut s = state();
        s.languages_offered = vec![Language::English, Language::German];
        let model = MenuModel::compute(&s);
        assert_eq!(model.languages.len(), 2);
        assert!(model.languages[0].selected);
        assert!(!model.languages[1].selected);
    }
}
