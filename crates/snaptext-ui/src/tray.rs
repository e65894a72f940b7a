use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ksni::TrayMethods;
use snaptext_types::{AppEvent, MenuAction};
use tracing::warn;

use crate::icon::tray_icon;
use crate::menu::{MenuModel, MenuState};

/// System tray binding. Holds a shared snapshot of the menu inputs and a
/// channel back to the controller; the menu itself is recomputed from the
/// snapshot on every render.
pub struct AppTray {
    state: Arc<Mutex<MenuState>>,
    actions: kanal::Sender<AppEvent>,
}

impl AppTray {
    pub fn new(state: Arc<Mutex<MenuState>>, actions: kanal::Sender<AppEvent>) -> Self {
        Self { state, actions }
    }

    fn send(&self, action: MenuAction) {
        if self.actions.send(AppEvent::Menu(action)).is_err() {
            warn!(?action, "controller is gone, menu action dropped");
        }
    }

    fn snapshot(&self) -> Option<MenuState> {
        match self.state.lock() {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        }
    }
}

impl ksni::Tray for AppTray {
    fn id(&self) -> String {
        "snaptext".into()
    }

    fn title(&self) -> String {
        self.snapshot()
            .map(|s| MenuModel::compute(&s).title)
            .unwrap_or_default()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            title: self.title(),
            ..Default::default()
        }
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        match self.snapshot() {
            Some(state) => vec![tray_icon(state.settings.resolved_logo())],
            None => Vec::new(),
        }
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::*;

        let Some(state) = self.snapshot() else {
            return Vec::new();
        };
        let model = MenuModel::compute(&state);

        let mut items: Vec<ksni::MenuItem<Self>> = vec![
            StandardItem {
                label: model.title,
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: model.hotkey_label,
                activate: Box::new(|this: &mut AppTray| this.send(MenuAction::ChangeHotkey)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: model.notifications_label,
                activate: Box::new(|this: &mut AppTray| {
                    this.send(MenuAction::ToggleNotifications)
                }),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: model.autostart_label,
                activate: Box::new(|this: &mut AppTray| this.send(MenuAction::ToggleAutostart)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: model.save_label,
                activate: Box::new(|this: &mut AppTray| this.send(MenuAction::ToggleSavePhotos)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Choose save folder".into(),
                visible: model.show_save_folder,
                activate: Box::new(|this: &mut AppTray| this.send(MenuAction::ChooseSaveFolder)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
        ];

        items.push(
            SubMenu {
                label: "Languages".into(),
                submenu: model
                    .languages
                    .into_iter()
                    .map(|entry| {
                        let language = entry.value;
                        CheckmarkItem {
                            label: entry.label,
                            checked: entry.selected,
                            activate: Box::new(move |this: &mut AppTray| {
                                this.send(MenuAction::ToggleLanguage(language))
                            }),
                            ..Default::default()
                        }
                        .into()
                    })
                    .collect(),
                ..Default::default()
            }
            .into(),
        );

        items.push(
            SubMenu {
                label: "Theme".into(),
                submenu: model
                    .theme_options
                    .into_iter()
                    .map(|entry| {
                        let theme = entry.value;
                        StandardItem {
                            label: entry.label,
                            visible: entry.visible,
                            activate: Box::new(move |this: &mut AppTray| {
                                this.send(MenuAction::SelectTheme(theme))
                            }),
                            ..Default::default()
                        }
                        .into()
                    })
                    .collect(),
                ..Default::default()
            }
            .into(),
        );

        items.push(
            SubMenu {
                label: "Logo".into(),
                submenu: model
                    .logo_options
                    .into_iter()
                    .map(|entry| {
                        let logo = entry.value;
                        StandardItem {
                            label: entry.label,
                            visible: entry.visible,
                            activate: Box::new(move |this: &mut AppTray| {
                                this.send(MenuAction::SelectLogoTheme(logo))
                            }),
                            ..Default::default()
                        }
                        .into()
                    })
                    .collect(),
                ..Default::default()
            }
            .into(),
        );

        items.push(MenuItem::Separator);
        items.push(
            StandardItem {
                label: "Quit".into(),
                activate: Box::new(|this: &mut AppTray| this.send(MenuAction::Quit)),
                ..Default::default()
            }
            .into(),
        );

        items
    }
}

pub async fn spawn_tray(tray: AppTray) -> Result<ksni::Handle<AppTray>> {
    tray.spawn().await.context("Failed to create tray icon")
}
