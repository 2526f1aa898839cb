use super::*;
use crate::*;

impl RoundEngine {
    /// Content is ready: build a deck from `unique_pairs` and start a round.
    /// When a round is already in progress this behaves like a restart against
    /// the new pairs. A failed build leaves every piece of state untouched.
    pub fn load_deck(
        &mut self,
        unique_pairs: Vec<Card>,
        events: &mut EventBus,
    ) -> Result<(), RoundError> {
        let deck = Deck::build(&unique_pairs, &mut self.rng)?;
        let replaced = self.phase != RoundPhase::Idle;
        self.unique_pairs = unique_pairs;
        self.start_round(deck);
        log::info!(
            "deck loaded pairs={} cards={}",
            self.deck.pair_count(),
            self.deck.len()
        );
        events.push(Event::DeckLoaded {
            pairs: self.deck.pair_count(),
            cards: self.deck.len(),
        });
        if replaced {
            events.push(Event::RoundRestarted {
                pairs: self.deck.pair_count(),
            });
        }
        self.commit(events);
        Ok(())
    }

    /// Reshuffles the same pairs into a fresh deck. Best score and player name
    /// are kept.
    pub fn restart(&mut self, events: &mut EventBus) -> Result<(), RoundError> {
        if self.unique_pairs.is_empty() {
            return Err(Rejection::NoDeck.into());
        }
        let deck = Deck::build(&self.unique_pairs, &mut self.rng)?;
        self.start_round(deck);
        log::info!("round restarted pairs={}", self.deck.pair_count());
        events.push(Event::RoundRestarted {
            pairs: self.deck.pair_count(),
        });
        self.commit(events);
        Ok(())
    }

    /// The content collaborator could not deliver pairs. Nothing to reset.
    pub fn content_failed(&mut self, reason: impl Into<String>, events: &mut EventBus) {
        let reason = reason.into();
        log::warn!("content load failed in phase {:?}: {reason}", self.phase);
        events.push(Event::ContentLoadFailed { reason });
    }

    fn start_round(&mut self, deck: Deck) {
        self.cancel_pending();
        self.deck = deck;
        self.revealed.clear();
        self.cleared.clear();
        self.score = Score::default();
        self.phase = RoundPhase::Ready;
    }
}
