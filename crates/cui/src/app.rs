use crate::persistence::FileStore;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use flip_core::{
    Card, Event, EventBus, KeyValueStore, MemoryStore, RoundEngine, RoundError, RoundPhase,
};
use flip_data::{load_cards, load_round_config};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

pub const GRID_COLUMNS: usize = 8;
pub const SKELETON_CARDS: usize = 24;
const MAX_EVENT_LOG: usize = 200;
const LABEL_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Congrats {
    pub moves: u32,
    pub best_score: u32,
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace<'a> {
    Hidden,
    Revealed(&'a str),
    Cleared(&'a str),
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub seed: u64,
    pub assets_dir: PathBuf,
    /// `None` keeps the profile in memory only.
    pub state_path: Option<PathBuf>,
}

pub struct App {
    pub engine: RoundEngine,
    pub events: EventBus,
    pub cursor: usize,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub name_prompt: Option<String>,
    pub congrats: Option<Congrats>,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(settings: &AppSettings) -> Result<Self> {
        let config = load_round_config(&settings.assets_dir).context("load round config")?;
        let store: Box<dyn KeyValueStore> = match settings.state_path.as_ref() {
            Some(path) => {
                let store = FileStore::open(path);
                log::info!("profile stored at {}", store.path().display());
                Box::new(store)
            }
            None => Box::new(MemoryStore::new()),
        };
        let per_page = config.per_page;
        let engine = RoundEngine::new(config, store, settings.seed);
        let cards = load_cards(&settings.assets_dir, per_page)
            .with_context(|| format!("load cards from {}", settings.assets_dir.display()));
        Ok(Self::with_content(engine, cards))
    }

    /// Wires a fresh engine to whatever the content loader produced. A load
    /// failure is reported to the engine, which stays idle.
    pub fn with_content(engine: RoundEngine, cards: Result<Vec<Card>>) -> Self {
        let mut app = Self {
            engine,
            events: EventBus::default(),
            cursor: 0,
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            name_prompt: None,
            congrats: None,
            should_quit: false,
        };
        match cards {
            Ok(cards) => {
                if let Err(err) = app.engine.load_deck(cards, &mut app.events) {
                    app.engine.content_failed(err.to_string(), &mut app.events);
                    app.push_status(format!("content unavailable: {err}"));
                }
            }
            Err(err) => {
                app.engine.content_failed(format!("{err:#}"), &mut app.events);
                app.push_status(format!("content unavailable: {err:#}"));
            }
        }
        if app.engine.needs_player_name() {
            app.name_prompt = Some(String::new());
        }
        app.flush_events();
        app
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        self.engine.advance(elapsed, &mut self.events);
        self.flush_events();
    }

    pub fn card_count(&self) -> usize {
        self.engine.deck().len()
    }

    pub fn card_face(&self, position: usize) -> CardFace<'_> {
        match self.engine.face_up(position) {
            None => CardFace::Hidden,
            Some(card) if self.engine.is_cleared(&card.pair_id) => {
                CardFace::Cleared(card.pair_id.as_str())
            }
            Some(card) => CardFace::Revealed(card.pair_id.as_str()),
        }
    }

    /// Display payload of a face-up card.
    pub fn card_artifact(&self, position: usize) -> Option<&str> {
        self.engine
            .face_up(position)
            .map(|card| card.artifact.as_str())
            .filter(|artifact| !artifact.is_empty())
    }

    pub fn card_label(&self, position: usize) -> String {
        let text = match self.card_face(position) {
            CardFace::Hidden => "??",
            CardFace::Revealed(label) | CardFace::Cleared(label) => label,
        };
        let short: String = text.chars().take(LABEL_WIDTH).collect();
        format!("{short:^width$}", width = LABEL_WIDTH)
    }

    pub fn next_hint(&self) -> &'static str {
        if self.name_prompt.is_some() {
            return "type your name";
        }
        if self.congrats.is_some() {
            return "restart or close";
        }
        match self.engine.phase() {
            RoundPhase::Idle => "waiting for content",
            RoundPhase::Ready | RoundPhase::Mismatch => "pick a card",
            RoundPhase::OneRevealed => "pick its match",
            RoundPhase::Evaluating => "checking",
            RoundPhase::Complete => "press r to play again",
        }
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let len = self.card_count();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor as isize + dx + dy * GRID_COLUMNS as isize;
        if (0..len as isize).contains(&target) {
            self.cursor = target as usize;
        }
    }

    pub fn activate_primary(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.name_prompt.is_some() {
            return;
        }
        if self.congrats.is_some() {
            self.restart();
            return;
        }
        self.reveal_selected();
    }

    pub fn reveal_selected(&mut self) {
        match self.engine.reveal_card(self.cursor, &mut self.events) {
            Ok(()) => {}
            Err(RoundError::RejectedTransition(reason)) => {
                log::debug!("reveal {} ignored: {reason}", self.cursor);
            }
            Err(err) => self.push_error(err),
        }
        self.flush_events();
    }

    pub fn restart(&mut self) {
        if self.name_prompt.is_some() {
            return;
        }
        match self.engine.restart(&mut self.events) {
            Ok(()) => {
                self.congrats = None;
                self.cursor = 0;
                self.push_status("new round");
            }
            Err(err) => self.push_error(err),
        }
        self.flush_events();
    }

    pub fn close_congrats(&mut self) {
        self.congrats = None;
    }

    /// Consumes keys while the name prompt is open. Escape does not close it;
    /// a name is required before play.
    pub fn handle_name_prompt_key(&mut self, key: KeyEvent) -> bool {
        let Some(input) = self.name_prompt.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Enter => self.submit_name(),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    input.push(ch);
                }
            }
            _ => {}
        }
        true
    }

    pub fn can_submit_name(&self) -> bool {
        self.name_prompt
            .as_deref()
            .is_some_and(|input| !input.trim().is_empty())
    }

    fn submit_name(&mut self) {
        let Some(input) = self.name_prompt.clone() else {
            return;
        };
        match self.engine.set_player_name(&input, &mut self.events) {
            Ok(()) => {
                self.name_prompt = None;
                self.push_status(format!(
                    "welcome {}",
                    self.engine.player_name().unwrap_or_default()
                ));
            }
            Err(err) => self.push_error(err),
        }
        self.flush_events();
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: RoundError) {
        self.status_line = format!("error: {err}");
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            if let Event::RoundComplete {
                moves,
                best_score,
                player_name,
            } = &event
            {
                self.congrats = Some(Congrats {
                    moves: *moves,
                    best_score: *best_score,
                    player_name: player_name.clone(),
                });
            }
            if matches!(event, Event::StateChanged { .. }) {
                continue;
            }
            self.push_event_line(format_event(&event));
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

pub fn format_event(event: &Event) -> String {
    match event {
        Event::DeckLoaded { pairs, cards } => format!("deck loaded: {pairs} pairs, {cards} cards"),
        Event::ContentLoadFailed { reason } => format!("content load failed: {reason}"),
        Event::CardRevealed { position, pair_id } => format!("revealed #{position} {pair_id}"),
        Event::PairMatched { pair_id, hits } => format!("matched {pair_id} (hits {hits})"),
        Event::PairMissed { positions, misses } => format!(
            "missed #{} / #{} (misses {misses})",
            positions[0], positions[1]
        ),
        Event::CardsHidden { positions } => {
            let list: Vec<String> = positions.iter().map(|pos| format!("#{pos}")).collect();
            format!("hid {}", list.join(" "))
        }
        Event::RoundRestarted { pairs } => format!("round restarted with {pairs} pairs"),
        Event::RoundComplete {
            moves,
            best_score,
            player_name,
        } => format!(
            "round complete by {} in {moves} moves (best {best_score})",
            player_name.as_deref().unwrap_or("-")
        ),
        Event::PlayerNamed { name } => format!("player name set: {name}"),
        Event::StateChanged { phase } => format!("state: {}", phase.label()),
    }
}
