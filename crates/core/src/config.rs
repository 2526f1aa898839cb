use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_EVALUATE_DELAY_MS: u64 = 300;
pub const DEFAULT_FLIP_BACK_DELAY_MS: u64 = 500;
pub const DEFAULT_PER_PAGE: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundConfig {
    /// Pause between the second reveal and the match check.
    #[serde(default = "default_evaluate_delay_ms")]
    pub evaluate_delay_ms: u64,
    /// How long a mismatched pair stays face-up.
    #[serde(default = "default_flip_back_delay_ms")]
    pub flip_back_delay_ms: u64,
    /// Upper bound on unique pairs taken from the catalogue.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl RoundConfig {
    pub fn evaluate_delay(&self) -> Duration {
        Duration::from_millis(self.evaluate_delay_ms)
    }

    pub fn flip_back_delay(&self) -> Duration {
        Duration::from_millis(self.flip_back_delay_ms)
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            evaluate_delay_ms: DEFAULT_EVALUATE_DELAY_MS,
            flip_back_delay_ms: DEFAULT_FLIP_BACK_DELAY_MS,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn default_evaluate_delay_ms() -> u64 {
    DEFAULT_EVALUATE_DELAY_MS
}

fn default_flip_back_delay_ms() -> u64 {
    DEFAULT_FLIP_BACK_DELAY_MS
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}
