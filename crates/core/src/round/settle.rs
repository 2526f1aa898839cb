use super::*;
use crate::*;

impl RoundEngine {
    /// Moves the engine clock forward by `elapsed`, firing every task that
    /// falls due on the way. A flip-back scheduled by an evaluate that fires
    /// here also fires here if its own delay fits in the window.
    pub fn advance(&mut self, elapsed: Duration, events: &mut EventBus) {
        let until = self.timers.now().saturating_add(elapsed);
        while let Some(task) = self.timers.pop_due(until) {
            if self.pending != Some(task.id) {
                log::debug!("dropping orphaned task {:?}", task.id);
                continue;
            }
            self.pending = None;
            match task.kind {
                TaskKind::Evaluate => self.evaluate(events),
                TaskKind::FlipBack => self.flip_back(events),
            }
        }
        self.timers.set_now(until);
    }

    fn evaluate(&mut self, events: &mut EventBus) {
        let (first, second) = match self.revealed.as_slice() {
            [first, second] => (*first, *second),
            other => {
                log::warn!("evaluate fired with {} revealed cards", other.len());
                return;
            }
        };
        let (Some(a), Some(b)) = (self.deck.get(first), self.deck.get(second)) else {
            log::warn!("evaluate fired for positions outside the deck");
            return;
        };
        if a.matches(b) {
            let pair_id = a.pair_id.clone();
            self.cleared.insert(pair_id.clone());
            self.revealed.clear();
            self.score.hits += 1;
            self.phase = RoundPhase::Ready;
            log::debug!("pair {pair_id} matched hits={}", self.score.hits);
            events.push(Event::PairMatched {
                pair_id,
                hits: self.score.hits,
            });
            self.check_completion(events);
        } else {
            self.score.misses += 1;
            self.phase = RoundPhase::Mismatch;
            let delay = self.config.flip_back_delay();
            self.schedule(TaskKind::FlipBack, delay);
            log::debug!("mismatch {first}/{second} misses={}", self.score.misses);
            events.push(Event::PairMissed {
                positions: [first, second],
                misses: self.score.misses,
            });
        }
        self.commit(events);
    }

    fn flip_back(&mut self, events: &mut EventBus) {
        let positions = std::mem::take(&mut self.revealed);
        self.phase = RoundPhase::Ready;
        events.push(Event::CardsHidden { positions });
        self.commit(events);
    }

    /// Finishes the round once every pair of a loaded deck is cleared.
    fn check_completion(&mut self, events: &mut EventBus) {
        let pairs = self.deck.pair_count();
        if pairs == 0 || self.cleared.len() != pairs {
            return;
        }
        let moves = self.score.moves();
        let best_score = self.record_best_score(moves);
        self.phase = RoundPhase::Complete;
        log::info!("round complete moves={moves} best={best_score}");
        events.push(Event::RoundComplete {
            moves,
            best_score,
            player_name: self.player_name.clone(),
        });
    }
}
