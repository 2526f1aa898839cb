use crate::{Card, PairId, RngState};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("no unique pairs to build a deck from")]
    EmptyInput,
    #[error("pair id {0} appears more than once in the unique pairs")]
    DuplicatePair(PairId),
}

/// Shuffled sequence of cards holding every unique pair exactly twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Doubles `unique_pairs` and shuffles the result. The input slice is only
    /// read; the deck owns fresh copies of every card.
    pub fn build(unique_pairs: &[Card], rng: &mut RngState) -> Result<Self, DeckError> {
        if unique_pairs.is_empty() {
            return Err(DeckError::EmptyInput);
        }
        let mut seen = HashSet::with_capacity(unique_pairs.len());
        for card in unique_pairs {
            if !seen.insert(&card.pair_id) {
                return Err(DeckError::DuplicatePair(card.pair_id.clone()));
            }
        }
        let mut cards = Vec::with_capacity(unique_pairs.len() * 2);
        cards.extend_from_slice(unique_pairs);
        cards.extend_from_slice(unique_pairs);
        rng.shuffle(&mut cards);
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of distinct pairs (N), half the deck length.
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn positions_of<'a>(&'a self, pair_id: &'a PairId) -> impl Iterator<Item = usize> + 'a {
        self.cards
            .iter()
            .enumerate()
            .filter(move |(_, card)| &card.pair_id == pair_id)
            .map(|(idx, _)| idx)
    }
}
