use crate::{
    read_best_score, read_player_name, Card, Deck, DeckError, EventBus, Event, KeyValueStore,
    PairId, RngState, RoundConfig, RoundPhase, Score, TaskId, TaskKind, Timers,
};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

mod lifecycle;
mod profile;
mod reveal;
mod settle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no deck loaded")]
    NoDeck,
    #[error("position {0} is outside the deck")]
    OutOfRange(usize),
    #[error("card at {0} is already cleared")]
    Cleared(usize),
    #[error("card at {0} is already face-up")]
    AlreadyRevealed(usize),
    #[error("input locked while evaluating")]
    InputLocked,
    #[error("round already complete")]
    RoundComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("player name must not be blank")]
    InvalidName,
    #[error("rejected: {0}")]
    RejectedTransition(#[from] Rejection),
}

/// Owns one player's rounds: deck, reveal/cleared state, counters, best score
/// and the delayed evaluate/flip-back tasks.
pub struct RoundEngine {
    config: RoundConfig,
    rng: RngState,
    store: Box<dyn KeyValueStore>,
    unique_pairs: Vec<Card>,
    deck: Deck,
    phase: RoundPhase,
    revealed: Vec<usize>,
    cleared: HashSet<PairId>,
    score: Score,
    best_score: Option<u32>,
    player_name: Option<String>,
    timers: Timers,
    pending: Option<TaskId>,
}

impl RoundEngine {
    pub fn new(config: RoundConfig, store: Box<dyn KeyValueStore>, seed: u64) -> Self {
        let best_score = read_best_score(store.as_ref());
        let player_name = read_player_name(store.as_ref());
        log::debug!("round engine created seed={seed} best={best_score:?} name={player_name:?}");
        Self {
            config,
            rng: RngState::from_seed(seed),
            store,
            unique_pairs: Vec::new(),
            deck: Deck::default(),
            phase: RoundPhase::Idle,
            revealed: Vec::with_capacity(2),
            cleared: HashSet::new(),
            score: Score::default(),
            best_score,
            player_name,
            timers: Timers::new(),
            pending: None,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn unique_pairs(&self) -> &[Card] {
        &self.unique_pairs
    }

    /// Face-up positions in reveal order.
    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed.contains(&position)
    }

    pub fn is_cleared(&self, pair_id: &PairId) -> bool {
        self.cleared.contains(pair_id)
    }

    pub fn is_position_cleared(&self, position: usize) -> bool {
        self.deck
            .get(position)
            .is_some_and(|card| self.cleared.contains(&card.pair_id))
    }

    pub fn cleared_count(&self) -> usize {
        self.cleared.len()
    }

    /// Card at `position` if the player is allowed to see it.
    pub fn face_up(&self, position: usize) -> Option<&Card> {
        let card = self.deck.get(position)?;
        if self.is_revealed(position) || self.cleared.contains(&card.pair_id) {
            Some(card)
        } else {
            None
        }
    }

    pub fn is_input_locked(&self) -> bool {
        self.phase == RoundPhase::Evaluating
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn hits(&self) -> u32 {
        self.score.hits
    }

    pub fn misses(&self) -> u32 {
        self.score.misses
    }

    pub fn moves(&self) -> u32 {
        self.score.moves()
    }

    /// `None` until a round has been completed.
    pub fn best_score(&self) -> Option<u32> {
        self.best_score
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn needs_player_name(&self) -> bool {
        self.player_name.is_none()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_task(&self) -> Option<TaskKind> {
        self.pending
            .and_then(|id| self.timers.get(id))
            .map(|task| task.kind)
    }

    /// Time left before the pending task fires.
    pub fn time_until_pending(&self) -> Option<Duration> {
        self.pending
            .and_then(|id| self.timers.get(id))
            .map(|task| task.due.saturating_sub(self.timers.now()))
    }

    fn schedule(&mut self, kind: TaskKind, delay: Duration) {
        self.cancel_pending();
        self.pending = Some(self.timers.schedule(kind, delay));
    }

    /// Every transition that supersedes delayed work goes through here before
    /// touching round state.
    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            if self.timers.cancel(id) {
                log::debug!("cancelled pending task {id:?}");
            }
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            log::warn!("failed to persist {key}: {err}");
        }
    }

    fn commit(&self, events: &mut EventBus) {
        events.push(Event::StateChanged { phase: self.phase });
    }
}
