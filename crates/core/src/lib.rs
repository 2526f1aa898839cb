//! Round logic for the flip memory game. Keep this crate free of IO and
//! platform concerns; persistence comes in through [`KeyValueStore`].

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod rng;
pub mod round;
pub mod state;
pub mod store;
pub mod timers;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use rng::*;
pub use round::*;
pub use state::*;
pub use store::*;
pub use timers::*;
