pub mod autostart;
pub mod settings;
pub mod store;

pub use autostart::StartupRegistry;
pub use settings::{APP_TITLE, Settings, SettingsPatch, SettingsStore};
pub use store::KvStore;
