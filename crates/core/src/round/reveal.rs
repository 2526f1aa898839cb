use super::*;
use crate::*;

impl RoundEngine {
    /// Player turns the card at `position` face-up.
    ///
    /// A first reveal supersedes a pending flip-back: the stale task is
    /// cancelled and the mismatched pair hidden before the new card shows. A
    /// second reveal locks input and schedules the evaluate task. Rejected
    /// reveals leave the engine untouched.
    pub fn reveal_card(
        &mut self,
        position: usize,
        events: &mut EventBus,
    ) -> Result<(), RoundError> {
        let (step, pair_id) = self.check_reveal(position)?;
        match step {
            RevealStep::First => {
                self.cancel_pending();
                if !self.revealed.is_empty() {
                    let positions = std::mem::take(&mut self.revealed);
                    events.push(Event::CardsHidden { positions });
                }
                self.revealed.push(position);
                self.phase = RoundPhase::OneRevealed;
            }
            RevealStep::Second => {
                self.revealed.push(position);
                self.phase = RoundPhase::Evaluating;
                let delay = self.config.evaluate_delay();
                self.schedule(TaskKind::Evaluate, delay);
            }
        }
        log::debug!("revealed {position} ({pair_id}) -> {:?}", self.phase);
        events.push(Event::CardRevealed { position, pair_id });
        self.commit(events);
        Ok(())
    }

    fn check_reveal(&self, position: usize) -> Result<(RevealStep, PairId), Rejection> {
        let step = match self.phase {
            RoundPhase::Idle => return Err(Rejection::NoDeck),
            RoundPhase::Evaluating => return Err(Rejection::InputLocked),
            RoundPhase::Complete => return Err(Rejection::RoundComplete),
            RoundPhase::Ready | RoundPhase::Mismatch => RevealStep::First,
            RoundPhase::OneRevealed => RevealStep::Second,
        };
        let card = self
            .deck
            .get(position)
            .ok_or(Rejection::OutOfRange(position))?;
        if self.cleared.contains(&card.pair_id) {
            return Err(Rejection::Cleared(position));
        }
        if self.revealed.contains(&position) {
            return Err(Rejection::AlreadyRevealed(position));
        }
        Ok((step, card.pair_id.clone()))
    }
}

enum RevealStep {
    /// Starts a new selection, superseding any mismatched pair still showing.
    First,
    /// Completes the selection and hands it to the evaluate task.
    Second,
}
