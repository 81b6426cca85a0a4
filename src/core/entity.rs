//! Entity identification.
//!
//! Cards and players are addressed by `EntityId`. Effects never hold
//! references to the objects they touch; they hold ids and look the
//! objects up in `GameState` when a transition runs.
//!
//! ## ID Layout
//!
//! - `0..player_count`: reserved for players
//! - `player_count..`: cards
//!
//! ```
//! use ccg_effects::core::EntityId;
//!
//! let player = EntityId::player_id(1);
//! assert!(player.is_player(2));
//! assert!(!EntityId(7).is_player(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card or player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Entity ID for a player by index.
    #[must_use]
    pub const fn player_id(index: u8) -> Self {
        Self(index as u32)
    }

    /// First ID available for cards in a game with `player_count` players.
    #[must_use]
    pub const fn first_non_player(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Check if this ID falls in the player range.
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
