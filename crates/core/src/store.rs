use std::collections::HashMap;
use thiserror::Error;

pub const BEST_SCORE_KEY: &str = "bestScore";
pub const PLAYER_NAME_KEY: &str = "playerName";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Opaque string store backing the values that outlive a round.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Missing or unparsable values mean no round has been completed yet.
pub fn read_best_score(store: &dyn KeyValueStore) -> Option<u32> {
    store
        .get(BEST_SCORE_KEY)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
}

pub fn read_player_name(store: &dyn KeyValueStore) -> Option<String> {
    store
        .get(PLAYER_NAME_KEY)
        .map(|raw| raw.trim().to_string())
        .filter(|name| !name.is_empty())
}
