use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

/// A flat key/value map persisted as one JSON object file.
///
/// Every accessor tolerates a missing, unreadable or malformed file by
/// treating it as empty; writes recreate the parent directory on demand.
/// Storage failures never propagate to callers.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Store scoped under the OS config directory: `<config>/snaptext/<scope>.json`.
    pub fn scoped(scope: &str) -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("snaptext").join(format!("{scope}.json")),
        }
    }

    /// Store backed by an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_map(&self) -> BTreeMap<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "settings file is malformed, starting empty");
                BTreeMap::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_map().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read_map().contains_key(key)
    }

    /// Merge `entries` over the stored map and persist the result.
    pub fn set_many(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let mut map = self.read_map();
        map.extend(entries);
        self.write_map(&map);
    }

    pub fn remove(&self, key: &str) {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map);
        }
    }

    pub fn clear(&self) {
        self.write_map(&BTreeMap::new());
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %err, "cannot create settings directory");
                return;
            }
        }
        let raw = match serde_json::to_string_pretty(map) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "cannot serialize settings");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), %err, "cannot write settings file");
        }
    }
}
