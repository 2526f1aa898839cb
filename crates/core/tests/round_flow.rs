use flip_core::{
    Card, Event, EventBus, MemoryStore, PairId, Rejection, RoundConfig, RoundEngine, RoundError,
    RoundPhase, TaskKind, BEST_SCORE_KEY, PLAYER_NAME_KEY,
};
use std::time::Duration;

const EVALUATE: Duration = Duration::from_millis(300);
const FLIP_BACK: Duration = Duration::from_millis(500);

fn pairs(ids: &[&str]) -> Vec<Card> {
    ids.iter()
        .map(|id| Card::new(*id, format!("https://img.example/{id}.png")))
        .collect()
}

fn new_engine(store: MemoryStore) -> (RoundEngine, EventBus) {
    let mut engine = RoundEngine::new(RoundConfig::default(), Box::new(store), 2024);
    let mut events = EventBus::default();
    engine
        .load_deck(pairs(&["a", "b", "c"]), &mut events)
        .expect("load deck");
    (engine, events)
}

fn positions(engine: &RoundEngine, id: &str) -> [usize; 2] {
    let pair_id = PairId::from(id);
    let found: Vec<usize> = engine.deck().positions_of(&pair_id).collect();
    [found[0], found[1]]
}

fn reveal_pair(engine: &mut RoundEngine, events: &mut EventBus, first: usize, second: usize) {
    engine.reveal_card(first, events).expect("first reveal");
    engine.reveal_card(second, events).expect("second reveal");
    engine.advance(EVALUATE, events);
}

fn completions(events: &mut EventBus) -> Vec<Event> {
    events
        .drain()
        .filter(|event| matches!(event, Event::RoundComplete { .. }))
        .collect()
}

#[test]
fn full_round_scenario() {
    let (mut engine, mut events) =
        new_engine(MemoryStore::new().with_entry(PLAYER_NAME_KEY, "Ada"));
    assert_eq!(engine.deck().len(), 6);
    let [a0, a1] = positions(&engine, "a");
    let [b0, b1] = positions(&engine, "b");
    let [c0, c1] = positions(&engine, "c");

    reveal_pair(&mut engine, &mut events, a0, a1);
    assert_eq!((engine.hits(), engine.misses()), (1, 0));
    assert!(engine.is_cleared(&PairId::from("a")));
    assert!(engine.revealed().is_empty());

    reveal_pair(&mut engine, &mut events, b0, c0);
    assert_eq!(engine.phase(), RoundPhase::Mismatch);
    assert_eq!((engine.hits(), engine.misses()), (1, 1));
    assert_eq!(engine.revealed().len(), 2);
    engine.advance(FLIP_BACK, &mut events);
    assert!(engine.revealed().is_empty());
    assert_eq!(engine.phase(), RoundPhase::Ready);

    reveal_pair(&mut engine, &mut events, b0, b1);
    assert_eq!(engine.hits(), 2);
    assert!(completions(&mut events).is_empty());

    reveal_pair(&mut engine, &mut events, c0, c1);
    assert_eq!(engine.hits(), 3);
    assert_eq!(engine.cleared_count(), 3);
    assert_eq!(engine.moves(), 4);
    assert_eq!(engine.phase(), RoundPhase::Complete);
    assert_eq!(
        completions(&mut events),
        vec![Event::RoundComplete {
            moves: 4,
            best_score: 4,
            player_name: Some("Ada".to_string()),
        }]
    );
    assert_eq!(engine.best_score(), Some(4));
    assert_eq!(engine.store().get(BEST_SCORE_KEY).as_deref(), Some("4"));
    assert_eq!(engine.score().moves(), engine.moves());
    assert_eq!(engine.seed(), 2024);
}

#[test]
fn stale_flip_back_cannot_clear_new_selection() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, _] = positions(&engine, "a");
    let [b0, _] = positions(&engine, "b");
    let [c0, _] = positions(&engine, "c");

    reveal_pair(&mut engine, &mut events, a0, b0);
    assert_eq!(engine.pending_task(), Some(TaskKind::FlipBack));

    engine.advance(Duration::from_millis(100), &mut events);
    engine.reveal_card(c0, &mut events).expect("reveal during flip-back window");
    assert_eq!(engine.revealed(), &[c0]);
    assert_eq!(engine.pending_task(), None);

    engine.advance(FLIP_BACK, &mut events);
    assert_eq!(engine.revealed(), &[c0]);
    assert_eq!(engine.phase(), RoundPhase::OneRevealed);
}

#[test]
fn mismatched_card_cannot_be_reselected_before_flip_back() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, _] = positions(&engine, "a");
    let [b0, _] = positions(&engine, "b");
    reveal_pair(&mut engine, &mut events, a0, b0);
    assert_eq!(
        engine.reveal_card(a0, &mut events),
        Err(RoundError::RejectedTransition(Rejection::AlreadyRevealed(a0)))
    );
    assert_eq!(engine.pending_task(), Some(TaskKind::FlipBack));
}

#[test]
fn cleared_cards_ignore_reveals() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, a1] = positions(&engine, "a");
    reveal_pair(&mut engine, &mut events, a0, a1);
    let _ = events.drain().count();
    for pos in [a0, a1] {
        assert_eq!(
            engine.reveal_card(pos, &mut events),
            Err(RoundError::RejectedTransition(Rejection::Cleared(pos)))
        );
    }
    assert!(events.is_empty());
    assert_eq!(engine.hits(), 1);
    assert_eq!(engine.phase(), RoundPhase::Ready);
}

#[test]
fn single_advance_runs_evaluate_then_flip_back() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, _] = positions(&engine, "a");
    let [b0, _] = positions(&engine, "b");
    engine.reveal_card(a0, &mut events).expect("first");
    engine.reveal_card(b0, &mut events).expect("second");
    engine.advance(EVALUATE + FLIP_BACK, &mut events);
    assert_eq!(engine.misses(), 1);
    assert!(engine.revealed().is_empty());
    assert_eq!(engine.phase(), RoundPhase::Ready);
    assert_eq!(engine.now(), EVALUATE + FLIP_BACK);
}

#[test]
fn evaluate_waits_for_its_delay() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, a1] = positions(&engine, "a");
    engine.reveal_card(a0, &mut events).expect("first");
    engine.reveal_card(a1, &mut events).expect("second");
    engine.advance(Duration::from_millis(299), &mut events);
    assert_eq!(engine.phase(), RoundPhase::Evaluating);
    assert_eq!(engine.time_until_pending(), Some(Duration::from_millis(1)));
    engine.advance(Duration::from_millis(1), &mut events);
    assert_eq!(engine.hits(), 1);
}

#[test]
fn restart_resets_round_but_keeps_profile() {
    let store = MemoryStore::new()
        .with_entry(PLAYER_NAME_KEY, "Ada")
        .with_entry(BEST_SCORE_KEY, "7");
    let (mut engine, mut events) = new_engine(store);
    let [a0, a1] = positions(&engine, "a");
    let [b0, _] = positions(&engine, "b");
    reveal_pair(&mut engine, &mut events, a0, a1);
    engine.reveal_card(b0, &mut events).expect("reveal");

    engine.restart(&mut events).expect("restart");
    assert_eq!(engine.phase(), RoundPhase::Ready);
    assert!(engine.revealed().is_empty());
    assert_eq!(engine.cleared_count(), 0);
    assert_eq!((engine.hits(), engine.misses(), engine.moves()), (0, 0, 0));
    assert_eq!(engine.best_score(), Some(7));
    assert_eq!(engine.player_name(), Some("Ada"));
    assert_eq!(engine.deck().len(), 6);
}

#[test]
fn restart_cancels_pending_evaluate() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let [a0, a1] = positions(&engine, "a");
    engine.reveal_card(a0, &mut events).expect("first");
    engine.reveal_card(a1, &mut events).expect("second");
    engine.restart(&mut events).expect("restart");
    assert_eq!(engine.pending_task(), None);
    engine.advance(EVALUATE * 4, &mut events);
    assert_eq!(engine.hits(), 0);
    assert_eq!(engine.phase(), RoundPhase::Ready);
}

#[test]
fn completion_fires_once_and_best_score_only_drops() {
    let (mut engine, mut events) =
        new_engine(MemoryStore::new().with_entry(BEST_SCORE_KEY, "5"));

    let play_perfect = |engine: &mut RoundEngine, events: &mut EventBus| {
        for id in ["a", "b", "c"] {
            let [first, second] = positions(engine, id);
            reveal_pair(engine, events, first, second);
        }
    };

    play_perfect(&mut engine, &mut events);
    assert_eq!(completions(&mut events).len(), 1);
    assert_eq!(engine.best_score(), Some(3));
    assert_eq!(
        engine.reveal_card(0, &mut events),
        Err(RoundError::RejectedTransition(Rejection::RoundComplete))
    );
    engine.advance(FLIP_BACK * 10, &mut events);
    assert!(completions(&mut events).is_empty());

    engine.restart(&mut events).expect("restart");
    let [a0, _] = positions(&engine, "a");
    let [b0, _] = positions(&engine, "b");
    reveal_pair(&mut engine, &mut events, a0, b0);
    engine.advance(FLIP_BACK, &mut events);
    play_perfect(&mut engine, &mut events);
    let done = completions(&mut events);
    assert_eq!(
        done,
        vec![Event::RoundComplete {
            moves: 4,
            best_score: 3,
            player_name: None,
        }]
    );
    assert_eq!(engine.best_score(), Some(3));
    assert_eq!(engine.store().get(BEST_SCORE_KEY).as_deref(), Some("3"));
}

#[test]
fn corrupt_best_score_is_treated_as_unset() {
    let (mut engine, mut events) =
        new_engine(MemoryStore::new().with_entry(BEST_SCORE_KEY, "not a number"));
    assert_eq!(engine.best_score(), None);
    for id in ["a", "b", "c"] {
        let [first, second] = positions(&engine, id);
        reveal_pair(&mut engine, &mut events, first, second);
    }
    assert_eq!(engine.best_score(), Some(3));
}

#[test]
fn every_transition_reports_state_change() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    let _ = events.drain().count();
    let [a0, a1] = positions(&engine, "a");
    engine.reveal_card(a0, &mut events).expect("first");
    let drained: Vec<_> = events.drain().collect();
    assert_eq!(
        drained.last(),
        Some(&Event::StateChanged {
            phase: RoundPhase::OneRevealed
        })
    );
    engine.reveal_card(a1, &mut events).expect("second");
    engine.advance(EVALUATE, &mut events);
    let drained: Vec<_> = events.drain().collect();
    assert!(drained.contains(&Event::PairMatched {
        pair_id: PairId::from("a"),
        hits: 1
    }));
    assert_eq!(
        drained.last(),
        Some(&Event::StateChanged {
            phase: RoundPhase::Ready
        })
    );
}

#[test]
fn clock_at_its_limit_keeps_settling_pairs() {
    let (mut engine, mut events) = new_engine(MemoryStore::new());
    engine.advance(Duration::MAX, &mut events);
    let [a0, a1] = positions(&engine, "a");
    engine.reveal_card(a0, &mut events).expect("first");
    engine.reveal_card(a1, &mut events).expect("second");
    assert_eq!(engine.time_until_pending(), Some(Duration::ZERO));
    engine.advance(Duration::from_millis(1), &mut events);
    assert_eq!(engine.hits(), 1);
    assert_eq!(engine.now(), Duration::MAX);
    assert_eq!(engine.phase(), RoundPhase::Ready);
}
