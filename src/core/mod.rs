//! Core host types: entities, players, configuration, state.
//!
//! These are the collaborators effects act on. They carry only what
//! effects read or mutate; turn structure and win conditions belong to
//! the embedding game.

pub mod config;
pub mod entity;
pub mod player;
pub mod state;

pub use config::{EngineConfig, ZoneId};
pub use entity::EntityId;
pub use player::{LocationId, PlayableLocation, PlayerId, PlayerMap, PlayerState};
pub use state::GameState;
