use std::sync::{Arc, Mutex};

use snaptext_config::{SettingsStore, StartupRegistry};
use snaptext_types::Language;
use snaptext_ui::MenuState;

/// Process-wide state: the settings store, the login-launch registry and
/// the menu snapshot the tray renders from.
pub struct AppState {
    pub store: tokio::sync::Mutex<SettingsStore>,
    pub registry: StartupRegistry,
    pub menu: Arc<Mutex<MenuState>>,
}

impl AppState {
    pub fn new(
        store: SettingsStore,
        registry: StartupRegistry,
        languages_offered: Vec<Language>,
    ) -> Self {
        let menu = Arc::new(Mutex::new(MenuState {
            settings: store.settings().clone(),
            auto_started: registry.is_auto_started(),
            languages_offered,
        }));
        Self {
            store: tokio::sync::Mutex::new(store),
            registry,
            menu,
        }
    }
}
