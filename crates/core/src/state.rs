use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// No deck yet.
    Idle,
    Ready,
    OneRevealed,
    /// Two cards face-up and locked until the evaluate task fires.
    Evaluating,
    /// Mismatched pair still face-up; the next reveal supersedes it.
    Mismatch,
    Complete,
}

impl RoundPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::OneRevealed => "one revealed",
            Self::Evaluating => "evaluating",
            Self::Mismatch => "mismatch",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub hits: u32,
    pub misses: u32,
}

impl Score {
    pub fn moves(&self) -> u32 {
        self.hits + self.misses
    }
}
