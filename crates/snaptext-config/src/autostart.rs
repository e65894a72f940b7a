use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::settings::APP_TITLE;

/// Login-launch registration via an XDG autostart entry: the session
/// manager launches everything with a `.desktop` file under
/// `<config>/autostart/`.
#[derive(Debug, Clone)]
pub struct StartupRegistry {
    dir: PathBuf,
}

impl StartupRegistry {
    pub fn open() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_dir(base.join("autostart"))
    }

    /// Registry rooted at an explicit autostart directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self) -> PathBuf {
        self.dir.join("snaptext.desktop")
    }

    /// Register or unregister the current executable. Idempotent; failures
    /// are logged and the previous state stays in effect.
    pub fn auto_start(&self, enable: bool) {
        if enable {
            let exe = match env::current_exe() {
                Ok(exe) => exe,
                Err(err) => {
                    warn!(%err, "cannot resolve current executable, autostart unchanged");
                    return;
                }
            };
            if let Err(err) = fs::create_dir_all(&self.dir) {
                warn!(dir = %self.dir.display(), %err, "cannot create autostart directory");
                return;
            }
            let entry = format!(
                "[Desktop Entry]\nType=Application\nName={APP_TITLE}\nExec={}\nX-GNOME-Autostart-enabled=true\n",
                exe.display()
            );
            match fs::write(self.entry_path(), entry) {
                Ok(()) => info!(exe = %exe.display(), "autostart enabled"),
                Err(err) => {
                    warn!(path = %self.entry_path().display(), %err, "cannot write autostart entry");
                }
            }
        } else {
            match fs::remove_file(self.entry_path()) {
                Ok(()) => info!("autostart disabled"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %self.entry_path().display(), %err, "cannot remove autostart entry");
                }
            }
        }
    }

    pub fn is_auto_started(&self) -> bool {
        self.entry_path().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StartupRegistry::with_dir(dir.path());
        assert!(!registry.is_auto_started());

        registry.auto_start(true);
        registry.auto_start(true);
        assert!(registry.is_auto_started());

        registry.auto_start(false);
        registry.auto_start(false);
        assert!(!registry.is_auto_started());
    }

    #[test]
    fn entry_is_a_desktop_file_launching_this_executable() {
        let dir = tempfile::tempdir().unwrap();
        let registry = StartupRegistry::with_dir(dir.path());
        registry.auto_start(true);

        let entry = fs::read_to_string(dir.path().join("snaptext.desktop")).unwrap();
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Type=Application\n"));
        let exe = env::current_exe().unwrap();
        assert!(entry.contains(&format!("Exec={}\n", exe.display())));

        registry.auto_start(false);
        assert!(!dir.path().join("snaptext.desktop").exists());
    }
}
