//! Engine configuration.
//!
//! Hosts configure the engine at startup with an `EngineConfig`. The
//! values here are the baselines that flexible effects modify: a
//! player's hand size and key cost, and the default number of uses a
//! granted ability starts with.

use serde::{Deserialize, Serialize};

/// Zone identifier. Hosts define what zones exist.
///
/// The engine doesn't interpret zone IDs - they're opaque identifiers
/// used by cards and playable locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// Engine configuration.
///
/// ## Example
///
/// ```
/// use ccg_effects::core::EngineConfig;
///
/// let config = EngineConfig::new(3)
///     .with_base_hand_size(7)
///     .with_default_ability_limit(2);
///
/// assert_eq!(config.player_count, 3);
/// assert_eq!(config.base_key_cost, 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of players (1-255).
    pub player_count: usize,

    /// Hand size before `modifyHandSize` effects.
    pub base_hand_size: i64,

    /// Key cost before `modifyKeyCost` effects.
    pub base_key_cost: i64,

    /// Uses per granted ability when the grant does not specify a limit.
    pub default_ability_limit: u32,
}

impl EngineConfig {
    /// Create a configuration for `player_count` players with default baselines.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the base hand size.
    #[must_use]
    pub fn with_base_hand_size(mut self, size: i64) -> Self {
        self.base_hand_size = size;
        self
    }

    /// Set the base key cost.
    #[must_use]
    pub fn with_base_key_cost(mut self, cost: i64) -> Self {
        self.base_key_cost = cost;
        self
    }

    /// Set the default limit for granted abilities.
    #[must_use]
    pub fn with_default_ability_limit(mut self, limit: u32) -> Self {
        self.default_ability_limit = limit;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            base_hand_size: 6,
            base_key_cost: 6,
            default_ability_limit: 1,
        }
    }
}
