use super::*;
use crate::*;

impl RoundEngine {
    pub fn set_player_name(&mut self, name: &str, events: &mut EventBus) -> Result<(), RoundError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoundError::InvalidName);
        }
        self.persist(PLAYER_NAME_KEY, name);
        self.player_name = Some(name.to_string());
        log::info!("player name set to {name}");
        events.push(Event::PlayerNamed {
            name: name.to_string(),
        });
        self.commit(events);
        Ok(())
    }

    /// Lowers the best score to `moves` when it improves on it and writes the
    /// result back to the store. Returns the best score after the update.
    pub(super) fn record_best_score(&mut self, moves: u32) -> u32 {
        let best = self.best_score.map_or(moves, |best| best.min(moves));
        self.best_score = Some(best);
        self.persist(BEST_SCORE_KEY, &best.to_string());
        best
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn blank_names_are_rejected() {
        let mut engine =
            RoundEngine::new(RoundConfig::default(), Box::new(MemoryStore::new()), 1);
        for name in ["", "   ", "\t\n"] {
            assert_eq!(
                engine.set_player_name(name, &mut EventBus::default()),
                Err(RoundError::InvalidName)
            );
        }
        assert!(engine.needs_player_name());
        assert_eq!(engine.store().get(PLAYER_NAME_KEY), None);
    }

    #[test]
    fn name_is_trimmed_and_persisted() {
        let mut engine =
            RoundEngine::new(RoundConfig::default(), Box::new(MemoryStore::new()), 1);
        let mut events = EventBus::default();
        engine.set_player_name("  Ada ", &mut events).expect("name");
        assert_eq!(engine.player_name(), Some("Ada"));
        assert_eq!(engine.store().get(PLAYER_NAME_KEY).as_deref(), Some("Ada"));
        assert!(events.drain().any(|event| event
            == Event::PlayerNamed {
                name: "Ada".to_string()
            }));
    }

    #[test]
    fn stored_values_are_picked_up_on_start() {
        let store = MemoryStore::new()
            .with_entry(PLAYER_NAME_KEY, "Grace")
            .with_entry(BEST_SCORE_KEY, "9");
        let engine = RoundEngine::new(RoundConfig::default(), Box::new(store), 1);
        assert_eq!(engine.player_name(), Some("Grace"));
        assert_eq!(engine.best_score(), Some(9));
        assert!(!engine.needs_player_name());
    }

    #[test]
    fn failing_store_does_not_block_naming() {
        struct BrokenStore;

        impl KeyValueStore for BrokenStore {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }

            fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::Io("disk full".to_string()))
            }
        }

        let mut engine = RoundEngine::new(RoundConfig::default(), Box::new(BrokenStore), 1);
        engine
            .set_player_name("Ada", &mut EventBus::default())
            .expect("name");
        assert_eq!(engine.player_name(), Some("Ada"));
    }
}
