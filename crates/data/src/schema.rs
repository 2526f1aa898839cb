use serde::{Deserialize, Serialize};

pub use flip_core::RoundConfig;

/// One page of the content service's `game` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPage {
    pub entries: Vec<EntryCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCard {
    pub meta: EntryMeta,
    pub fields: EntryFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMeta {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryFields {
    pub image: EntryImage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryImage {
    pub url: String,
}
