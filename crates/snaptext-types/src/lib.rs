pub mod types;

pub use types::{AppEvent, CaptureRect, Language, LogoTheme, MenuAction, Theme};
