use flip_core::{EventBus, PairId, RoundEngine, RoundPhase};
use std::collections::HashMap;

/// Plays with perfect recall of every card it has seen face-up.
#[derive(Debug, Default)]
pub struct MemoryBot {
    seen: HashMap<usize, PairId>,
}

impl MemoryBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveals one pair of cards and lets the engine settle them.
    /// Returns false once there is nothing left to turn.
    pub fn play_turn(&mut self, engine: &mut RoundEngine, events: &mut EventBus) -> bool {
        if matches!(engine.phase(), RoundPhase::Idle | RoundPhase::Complete) {
            return false;
        }
        self.forget_cleared(engine);
        let (first, second) = match self.known_pair() {
            Some(pair) => pair,
            None => {
                let Some(first) = self.pick_unseen(engine, None) else {
                    return false;
                };
                if !self.reveal(engine, first, events) {
                    return false;
                }
                let partner = self.seen.get(&first).and_then(|pair_id| {
                    self.seen
                        .iter()
                        .find(|(pos, id)| **pos != first && *id == pair_id)
                        .map(|(pos, _)| *pos)
                });
                let second = partner
                    .or_else(|| self.pick_unseen(engine, Some(first)))
                    .or_else(|| self.pick_any(engine, first));
                let Some(second) = second else {
                    return false;
                };
                self.reveal(engine, second, events);
                self.settle(engine, events);
                return true;
            }
        };
        self.reveal(engine, first, events);
        self.reveal(engine, second, events);
        self.settle(engine, events);
        true
    }

    fn reveal(&mut self, engine: &mut RoundEngine, position: usize, events: &mut EventBus) -> bool {
        if let Err(err) = engine.reveal_card(position, events) {
            log::debug!("bot reveal {position} refused: {err}");
            return false;
        }
        if let Some(card) = engine.face_up(position) {
            self.seen.insert(position, card.pair_id.clone());
        }
        true
    }

    fn settle(&self, engine: &mut RoundEngine, events: &mut EventBus) {
        let config = engine.config();
        let window = config.evaluate_delay() + config.flip_back_delay();
        engine.advance(window, events);
    }

    fn forget_cleared(&mut self, engine: &RoundEngine) {
        self.seen
            .retain(|position, _| !engine.is_position_cleared(*position));
    }

    fn known_pair(&self) -> Option<(usize, usize)> {
        let mut by_pair: HashMap<&PairId, usize> = HashMap::new();
        let mut positions: Vec<(&usize, &PairId)> = self.seen.iter().collect();
        positions.sort_by_key(|(pos, _)| **pos);
        for (position, pair_id) in positions {
            if let Some(other) = by_pair.insert(pair_id, *position) {
                return Some((other, *position));
            }
        }
        None
    }

    fn pick_unseen(&self, engine: &RoundEngine, skip: Option<usize>) -> Option<usize> {
        (0..engine.deck().len()).find(|pos| {
            Some(*pos) != skip
                && !self.seen.contains_key(pos)
                && !engine.is_position_cleared(*pos)
        })
    }

    fn pick_any(&self, engine: &RoundEngine, skip: usize) -> Option<usize> {
        (0..engine.deck().len()).find(|pos| *pos != skip && !engine.is_position_cleared(*pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flip_core::{Card, MemoryStore, RoundConfig};

    fn engine(seed: u64) -> RoundEngine {
        let mut engine =
            RoundEngine::new(RoundConfig::default(), Box::new(MemoryStore::new()), seed);
        let cards = ["ant", "bee", "cat", "dog", "eel"]
            .iter()
            .map(|slug| Card::new(*slug, format!("{slug}.png")))
            .collect();
        engine.load_deck(cards, &mut EventBus::default()).unwrap();
        engine
    }

    #[test]
    fn bot_finishes_a_round() {
        let mut engine = engine(9);
        let mut events = EventBus::default();
        let mut bot = MemoryBot::new();
        let mut turns = 0;
        while bot.play_turn(&mut engine, &mut events) {
            turns += 1;
            assert!(turns < 100, "bot did not converge");
        }
        assert_eq!(engine.phase(), RoundPhase::Complete);
        assert_eq!(engine.hits(), 5);
        assert_eq!(engine.moves(), engine.hits() + engine.misses());
    }

    #[test]
    fn bot_never_misses_more_than_the_deck_size() {
        for seed in 0..20 {
            let mut engine = engine(seed);
            let mut events = EventBus::default();
            let mut bot = MemoryBot::new();
            while bot.play_turn(&mut engine, &mut events) {}
            assert!(engine.misses() <= 10, "seed {seed}: {}", engine.misses());
        }
    }

    #[test]
    fn bot_does_nothing_without_a_deck() {
        let mut engine =
            RoundEngine::new(RoundConfig::default(), Box::new(MemoryStore::new()), 1);
        let mut bot = MemoryBot::new();
        assert!(!bot.play_turn(&mut engine, &mut EventBus::default()));
    }
}
