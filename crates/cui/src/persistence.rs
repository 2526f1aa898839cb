use flip_core::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedProfile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Key/value store kept as a small JSON document on disk. Every `set` writes
/// the whole document back.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Unreadable, corrupt or foreign-version files start out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_profile_file(&path) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("ignoring state file {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        save_profile_file(&self.path, &self.entries)
    }
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("FLIP_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".flip_state.json"))
}

fn save_profile_file(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
    let payload = SavedProfile {
        version: SAVE_SCHEMA_VERSION,
        entries: entries.clone(),
    };
    let body = serde_json::to_string_pretty(&payload)
        .map_err(|err| StoreError::Serialize(err.to_string()))?;
    fs::write(path, body).map_err(|err| StoreError::Io(err.to_string()))
}

fn load_profile_file(path: &Path) -> Result<BTreeMap<String, String>, String> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let body = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let payload: SavedProfile = serde_json::from_str(&body).map_err(|err| err.to_string())?;
    if payload.version != SAVE_SCHEMA_VERSION {
        return Err(format!(
            "unsupported save version {} (expected {})",
            payload.version, SAVE_SCHEMA_VERSION
        ));
    }
    Ok(payload.entries)
}
