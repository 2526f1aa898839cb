use crate::{PairId, RoundPhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    DeckLoaded { pairs: usize, cards: usize },
    ContentLoadFailed { reason: String },
    CardRevealed { position: usize, pair_id: PairId },
    PairMatched { pair_id: PairId, hits: u32 },
    PairMissed { positions: [usize; 2], misses: u32 },
    CardsHidden { positions: Vec<usize> },
    RoundRestarted { pairs: usize },
    RoundComplete {
        moves: u32,
        best_score: u32,
        player_name: Option<String>,
    },
    PlayerNamed { name: String },
    StateChanged { phase: RoundPhase },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
