mod icon;
mod menu;
mod overlay;
mod tray;

pub use icon::tray_icon;
pub use menu::{MenuModel, MenuState, OptionEntry, ToggleEntry};
pub use overlay::EframeSelector;
pub use tray::{AppTray, spawn_tray};
