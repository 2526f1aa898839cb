use crate::schema::{EntryPage, RoundConfig};
use anyhow::{bail, Context};
use flip_core::Card;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CARDS_FILE: &str = "cards.json";
pub const ROUND_FILE: &str = "round.json";

/// Round settings from `round.json`; a missing file means defaults.
pub fn load_round_config(dir: &Path) -> anyhow::Result<RoundConfig> {
    let path = dir.join(ROUND_FILE);
    if !path.exists() {
        return Ok(RoundConfig::default());
    }
    load_json(&path)
}

/// Unique pairs from `cards.json`, at most `per_page` of them.
pub fn load_cards(dir: &Path, per_page: usize) -> anyhow::Result<Vec<Card>> {
    let page: EntryPage = load_json(&dir.join(CARDS_FILE))?;
    cards_from_page(page, per_page)
}

pub fn parse_cards(raw: &str, per_page: usize) -> anyhow::Result<Vec<Card>> {
    let page: EntryPage = serde_json::from_str(raw).context("parse card entries")?;
    cards_from_page(page, per_page)
}

fn cards_from_page(page: EntryPage, per_page: usize) -> anyhow::Result<Vec<Card>> {
    let mut seen = HashSet::new();
    let mut cards = Vec::with_capacity(page.entries.len().min(per_page));
    for entry in page.entries.into_iter().take(per_page) {
        let slug = entry.meta.slug.trim();
        if slug.is_empty() {
            bail!("card entry without slug");
        }
        if !seen.insert(slug.to_string()) {
            bail!("duplicate card slug {slug}");
        }
        cards.push(Card::new(slug, entry.fields.image.url));
    }
    if cards.is_empty() {
        bail!("card catalogue is empty");
    }
    Ok(cards)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
