//! Players and per-player data.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 players.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access.
//!
//! ## PlayerState
//!
//! The parts of a player that effects read or mutate: the ledger of
//! static effects currently applied to the player, and the extra
//! locations the player may play cards from.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::config::ZoneId;
use crate::effects::EffectLedger;

/// Player identifier supporting 1-255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use ccg_effects::core::{PlayerId, PlayerMap};
///
/// let mut amber: PlayerMap<i32> = PlayerMap::new(2, |_| 0);
/// amber[PlayerId::new(1)] += 3;
/// assert_eq!(amber[PlayerId::new(1)], 3);
/// assert!(amber.get(PlayerId::new(5)).is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a player's data, if the player exists.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a player's data mutably, if the player exists.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Identity of a playable location granted to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u32);

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Location({})", self.0)
    }
}

/// An extra zone a player may perform an action type from.
///
/// `play_type` is the action type this location opens up ("play"),
/// `owner` is whose copy of `zone` is meant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableLocation {
    pub id: LocationId,
    pub play_type: String,
    pub owner: PlayerId,
    pub zone: ZoneId,
}

/// Effect-visible state of a player.
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// This player.
    pub id: PlayerId,

    /// Static effects currently applied to this player.
    pub effects: EffectLedger,

    playable_locations: Vec<PlayableLocation>,
    next_location_id: u32,
}

impl PlayerState {
    /// Create a player with no applied effects and no extra locations.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            effects: EffectLedger::default(),
            playable_locations: Vec::new(),
            next_location_id: 0,
        }
    }

    /// Open `zone` of `owner` as a location this player can `play_type` from.
    pub fn add_playable_location(
        &mut self,
        play_type: impl Into<String>,
        owner: PlayerId,
        zone: ZoneId,
    ) -> LocationId {
        let id = LocationId(self.next_location_id);
        self.next_location_id += 1;
        self.playable_locations.push(PlayableLocation {
            id,
            play_type: play_type.into(),
            owner,
            zone,
        });
        id
    }

    /// Remove a playable location by identity.
    ///
    /// Returns false if it was not present.
    pub fn remove_playable_location(&mut self, id: LocationId) -> bool {
        match self.playable_locations.iter().position(|loc| loc.id == id) {
            Some(pos) => {
                self.playable_locations.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Locations currently open to this player, oldest first.
    #[must_use]
    pub fn playable_locations(&self) -> &[PlayableLocation] {
        &self.playable_locations
    }

    /// Can this player `play_type` from `owner`'s `zone`?
    #[must_use]
    pub fn can_act_from(&self, play_type: &str, owner: PlayerId, zone: ZoneId) -> bool {
        self.playable_locations
            .iter()
            .any(|loc| loc.play_type == play_type && loc.owner == owner && loc.zone == zone)
    }
}
