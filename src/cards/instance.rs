//! Card instances - the effect-visible state of a card in play.
//!
//! Besides the usual owner/controller/zone bookkeeping a card carries:
//! - `abilities`: printed and granted abilities
//! - `effects`: static effects currently applied to it
//! - `granted_limits`: remaining uses of abilities this card has granted
//!   to other cards, kept for as long as this card exists

use rustc_hash::FxHashMap;

use super::ability::{AbilityKind, CardAbilities, UseLimit};
use crate::core::config::ZoneId;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::effects::EffectLedger;

/// One granted ability on one receiving card.
///
/// A source granting several abilities to the same card gets one slot per
/// ability, so spending one never touches the others.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GrantSlot {
    pub card: EntityId,
    pub kind: AbilityKind,
    pub name: String,
}

impl GrantSlot {
    pub fn new(card: EntityId, kind: AbilityKind, name: impl Into<String>) -> Self {
        Self {
            card,
            kind,
            name: name.into(),
        }
    }
}

/// Remaining-use cache for abilities a source card grants.
///
/// Recalculation can take a granted ability away and hand out a fresh one;
/// the fresh copy is given the cached `UseLimit`, which the old copy
/// decremented in place, so it never refills.
#[derive(Clone, Debug, Default)]
pub struct GrantedAbilityLimits {
    limits: FxHashMap<GrantSlot, UseLimit>,
}

impl GrantedAbilityLimits {
    /// Shared limit for `slot`, caching a fresh one with `initial` uses on
    /// first sight.
    pub fn get_or_insert(&mut self, slot: GrantSlot, initial: u32) -> UseLimit {
        self.limits
            .entry(slot)
            .or_insert_with(|| UseLimit::new(initial))
            .clone()
    }

    /// Remaining uses cached for `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: &GrantSlot) -> Option<u32> {
        self.limits.get(slot).map(UseLimit::remaining)
    }

    /// Forget every cached limit. Hosts call this when the source is destroyed.
    pub fn clear(&mut self) {
        self.limits.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// A card in a game.
///
/// ## State Values (i64 only)
///
/// `state` holds printed and counter values ("power", "armor",
/// "damage"). Effects never write these; flexible modifiers are summed
/// on read by `EffectEngine`.
#[derive(Clone, Debug)]
pub struct CardInstance {
    /// Unique entity ID for this card.
    pub entity_id: EntityId,

    /// Display name.
    pub name: String,

    /// Owner (who started with this card). `None` for neutral cards.
    pub owner: Option<PlayerId>,

    /// Controller (who currently controls it).
    pub controller: Option<PlayerId>,

    /// Current zone.
    pub zone: ZoneId,

    /// Printed values and counters.
    pub state: FxHashMap<String, i64>,

    /// Printed and granted abilities.
    pub abilities: CardAbilities,

    /// Static effects applied to this card.
    pub effects: EffectLedger,

    /// Limits of abilities this card has granted to others.
    pub granted_limits: GrantedAbilityLimits,
}

impl CardInstance {
    /// Create a card owned and controlled by `owner`.
    #[must_use]
    pub fn new(entity_id: EntityId, name: impl Into<String>, owner: PlayerId, zone: ZoneId) -> Self {
        Self {
            entity_id,
            name: name.into(),
            owner: Some(owner),
            controller: Some(owner),
            zone,
            state: FxHashMap::default(),
            abilities: CardAbilities::default(),
            effects: EffectLedger::default(),
            granted_limits: GrantedAbilityLimits::default(),
        }
    }

    /// Set a printed value (builder pattern).
    #[must_use]
    pub fn with_state(mut self, key: impl Into<String>, value: i64) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    /// Get a state value with a default.
    #[must_use]
    pub fn get_state(&self, key: &str, default: i64) -> i64 {
        self.state.get(key).copied().unwrap_or(default)
    }

    /// Set a state value.
    pub fn set_state(&mut self, key: impl Into<String>, value: i64) {
        self.state.insert(key.into(), value);
    }
}
