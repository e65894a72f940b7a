use std::str::FromStr;
use std::sync::{Mutex, OnceLock, mpsc};
use std::thread;

use anyhow::{Context, Result, anyhow, ensure};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use rdev::EventType;
use tracing::warn;

/// An OS-level hotkey registration, released on drop.
///
/// `GlobalHotKeyManager` must stay on the thread that created it, so the
/// owner keeps this struct on a dedicated thread and polls events through
/// the process-wide receiver via [`poll_pressed`].
pub struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyRegistration {
    pub fn register(spec: &str) -> Result<Self> {
        let hotkey = parse_hotkey(spec)?;
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;
        manager
            .register(hotkey)
            .with_context(|| format!("Failed to register hotkey '{spec}'"))?;
        Ok(Self { manager, hotkey })
    }

    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}

/// Drain pending hotkey events, reporting whether `id` was pressed.
pub fn poll_pressed(id: u32) -> bool {
    let receiver = GlobalHotKeyEvent::receiver();
    let mut fired = false;
    while let Ok(event) = receiver.try_recv() {
        if event.id == id && event.state == HotKeyState::Pressed {
            fired = true;
        }
    }
    fired
}

/// Parse a `+`-joined lowercase token string into a registrable hotkey.
pub fn parse_hotkey(spec: &str) -> Result<HotKey> {
    let mut modifiers = Modifiers::empty();
    let mut code: Option<Code> = None;

    for token in spec
        .split('+')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
    {
        match token.as_str() {
            "shift" => modifiers |= Modifiers::SHIFT,
            "alt" => modifiers |= Modifiers::ALT,
            "ctrl" | "control" => modifiers |= Modifiers::CONTROL,
            "windows" | "meta" | "super" | "cmd" => modifiers |= Modifiers::META,
            "capslock" => modifiers |= Modifiers::CAPS_LOCK,
            key => {
                ensure!(code.is_none(), "hotkey '{spec}' names more than one key");
                code = Some(
                    parse_code(key)
                        .with_context(|| format!("unknown key '{key}' in hotkey '{spec}'"))?,
                );
            }
        }
    }

    let code = code.with_context(|| format!("hotkey '{spec}' has no non-modifier key"))?;
    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, code))
}

fn parse_code(key: &str) -> Option<Code> {
    if key.len() == 1 {
        let c = key.chars().next()?;
        if c.is_ascii_lowercase() {
            return Code::from_str(&format!("Key{}", c.to_ascii_uppercase())).ok();
        }
        if c.is_ascii_digit() {
            return Code::from_str(&format!("Digit{c}")).ok();
        }
    }
    if key == "space" {
        return Some(Code::Space);
    }
    if let Some(n) = key.strip_prefix('f') {
        if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) {
            return Code::from_str(&format!("F{n}")).ok();
        }
    }
    // Named keys like "escape" or "tab".
    let mut chars = key.chars();
    let first = chars.next()?;
    let named = first.to_uppercase().collect::<String>() + chars.as_str();
    Code::from_str(&named).ok()
}

/// Collapse left/right and vendor modifier variants and deduplicate,
/// preserving first-seen order.
pub fn fold_tokens(tokens: impl IntoIterator<Item = String>) -> String {
    let mut folded: Vec<&str> = Vec::new();
    let owned: Vec<String> = tokens.into_iter().collect();
    for token in &owned {
        let token = match token.as_str() {
            "shiftleft" | "shiftright" => "shift",
            "controlleft" | "controlright" | "control" => "ctrl",
            "altgr" => "alt",
            "metaleft" | "metaright" | "meta" => "windows",
            other => other,
        };
        if !folded.contains(&token) {
            folded.push(token);
        }
    }
    folded.join("+")
}

fn key_token(key: rdev::Key) -> String {
    use rdev::Key::*;
    match key {
        ShiftLeft => "shiftleft".into(),
        ShiftRight => "shiftright".into(),
        ControlLeft => "controlleft".into(),
        ControlRight => "controlright".into(),
        Alt => "alt".into(),
        AltGr => "altgr".into(),
        MetaLeft => "metaleft".into(),
        MetaRight => "metaright".into(),
        CapsLock => "capslock".into(),
        Space => "space".into(),
        _ => {
            let name = format!("{key:?}").to_lowercase();
            name.strip_prefix("key")
                .or_else(|| name.strip_prefix("num"))
                .unwrap_or(&name)
                .to_string()
        }
    }
}

enum RawKeyEvent {
    Press(String),
    Release,
}

static KEY_EVENTS: OnceLock<Mutex<mpsc::Receiver<RawKeyEvent>>> = OnceLock::new();

// rdev's listener blocks its thread forever and cannot be stopped, so one
// forwarder thread is started lazily and shared by every recording.
fn key_events() -> &'static Mutex<mpsc::Receiver<RawKeyEvent>> {
    KEY_EVENTS.get_or_init(|| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = rdev::listen(move |event| {
                let mapped = match event.event_type {
                    EventType::KeyPress(key) => Some(RawKeyEvent::Press(key_token(key))),
                    EventType::KeyRelease(_) => Some(RawKeyEvent::Release),
                    _ => None,
                };
                if let Some(ev) = mapped {
                    let _ = tx.send(ev);
                }
            });
            if let Err(err) = outcome {
                warn!(?err, "keyboard listener stopped");
            }
        });
        Mutex::new(rx)
    })
}

/// Block until the user presses a combination and releases any key of it,
/// then return the folded `+`-joined token string.
pub fn record_hotkey() -> Result<String> {
    let rx = key_events()
        .lock()
        .map_err(|_| anyhow!("keyboard listener lock poisoned"))?;

    // Discard anything typed before this recording started.
    while rx.try_recv().is_ok() {}

    let mut tokens: Vec<String> = Vec::new();
    loop {
        match rx.recv().context("keyboard listener disconnected")? {
            RawKeyEvent::Press(token) => {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
            // A release before any press is a leftover from the triggering
            // click; ignore it.
            RawKeyEvent::Release if tokens.is_empty() => {}
            RawKeyEvent::Release => break,
        }
    }
    Ok(fold_tokens(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_combination() {
        let parsed = parse_hotkey("shift+alt+a").unwrap();
        assert_eq!(
            parsed,
            HotKey::new(Some(Modifiers::SHIFT | Modifiers::ALT), Code::KeyA)
        );
    }

    #[test]
    fn parses_digits_function_keys_and_bare_keys() {
        assert_eq!(
            parse_hotkey("ctrl+1").unwrap(),
            HotKey::new(Some(Modifiers::CONTROL), Code::Digit1)
        );
        assert_eq!(
            parse_hotkey("f5").unwrap(),
            HotKey::new(None, Code::F5)
        );
        assert_eq!(
            parse_hotkey("windows+space").unwrap(),
            HotKey::new(Some(Modifiers::META), Code::Space)
        );
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_hotkey("shift+alt").is_err());
        assert!(parse_hotkey("a+b").is_err());
        assert!(parse_hotkey("shift+definitelynotakey").is_err());
        assert!(parse_hotkey("").is_err());
    }

    #[test]
    fn non_ascii_key_is_an_error_not_a_panic() {
        assert!(parse_hotkey("shift+é").is_err());
        assert!(parse_hotkey("ß").is_err());
    }

    #[test]
    fn folding_collapses_variants_and_dedupes() {
        let tokens = ["shiftleft", "shiftright", "metaleft", "a", "a"]
            .into_iter()
            .map(String::from);
        assert_eq!(fold_tokens(tokens), "shift+windows+a");
    }

    #[test]
    fn folding_preserves_press_order() {
        let tokens = ["controlleft", "altgr", "q"].into_iter().map(String::from);
        assert_eq!(fold_tokens(tokens), "ctrl+alt+q");
    }

    #[test]
    fn recorded_tokens_parse_back() {
        let folded = fold_tokens(
            ["shiftleft", "altgr", "a"].into_iter().map(String::from),
        );
        assert!(parse_hotkey(&folded).is_ok());
    }
}
