use flip_core::{
    Card, Deck, EventBus, MemoryStore, PairId, RngState, RoundConfig, RoundEngine, RoundPhase,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

fn unique_pairs(count: usize) -> Vec<Card> {
    (0..count)
        .map(|idx| Card::new(format!("pair-{idx}"), format!("art-{idx}")))
        .collect()
}

#[derive(Debug, Clone)]
enum Step {
    Reveal(usize),
    Wait(u64),
    Restart,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0usize..16).prop_map(Step::Reveal),
        3 => (0u64..900).prop_map(Step::Wait),
        1 => Just(Step::Restart),
    ]
}

proptest! {
    #[test]
    fn deck_holds_each_pair_twice(count in 1usize..30, seed in any::<u64>()) {
        let input = unique_pairs(count);
        let deck = Deck::build(&input, &mut RngState::from_seed(seed)).expect("deck");
        prop_assert_eq!(deck.len(), count * 2);
        let mut counts: HashMap<&PairId, usize> = HashMap::new();
        for card in deck.cards() {
            *counts.entry(&card.pair_id).or_default() += 1;
        }
        prop_assert_eq!(counts.len(), count);
        prop_assert!(counts.values().all(|seen| *seen == 2));
        prop_assert_eq!(input, unique_pairs(count));
    }

    #[test]
    fn reveal_set_never_exceeds_two(
        seed in any::<u64>(),
        steps in proptest::collection::vec(step(), 1..120),
    ) {
        let store = Box::new(MemoryStore::new());
        let mut engine = RoundEngine::new(RoundConfig::default(), store, seed);
        let mut events = EventBus::default();
        engine.load_deck(unique_pairs(8), &mut events).expect("load");
        let mut completions = 0usize;
        for step in steps {
            match step {
                Step::Reveal(pos) => {
                    let _ = engine.reveal_card(pos, &mut events);
                }
                Step::Wait(ms) => engine.advance(Duration::from_millis(ms), &mut events),
                Step::Restart => {
                    engine.restart(&mut events).expect("restart");
                    completions = 0;
                }
            }
            prop_assert!(engine.revealed().len() <= 2);
            prop_assert_eq!(engine.moves(), engine.hits() + engine.misses());
            prop_assert!(engine.cleared_count() <= engine.deck().pair_count());
            for pos in engine.revealed() {
                prop_assert!(!engine.is_position_cleared(*pos));
            }
            prop_assert_eq!(
                engine.phase() == RoundPhase::Complete,
                engine.cleared_count() == engine.deck().pair_count()
            );
            completions += events
                .drain()
                .filter(|event| matches!(event, flip_core::Event::RoundComplete { .. }))
                .count();
            prop_assert!(completions <= 1);
        }
    }
}
