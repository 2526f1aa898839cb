use serde::{Deserialize, Serialize};
use std::fmt;

/// Key shared by the two cards of a matching pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PairId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PairId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Display payload forwarded to the renderer. The engine never looks inside.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Artifact(String);

impl Artifact {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub pair_id: PairId,
    #[serde(default)]
    pub artifact: Artifact,
}

impl Card {
    pub fn new(pair_id: impl Into<PairId>, artifact: impl Into<String>) -> Self {
        Self {
            pair_id: pair_id.into(),
            artifact: Artifact::new(artifact),
        }
    }

    pub fn matches(&self, other: &Card) -> bool {
        self.pair_id == other.pair_id
    }
}
