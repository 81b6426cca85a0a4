//! Abilities attached to cards.
//!
//! A card carries two ability lists: `actions` (activated by the
//! player) and `reactions` (everything that listens for an event:
//! fight, reap, play and generic triggered abilities). Abilities
//! added by effects are marked `printed: false`.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::{smallvec, SmallVec};

use crate::triggers::{events, EventTypeId};

/// Unique identifier for an ability instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    /// Create a new ability ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// Sub-kind of an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Activated by the controller ("Action:").
    Action,
    /// Fires after the card fights.
    Fight,
    /// Fires after the card reaps.
    Reap,
    /// Fires when the card is played.
    Play,
    /// Fires on an arbitrary event type.
    Triggered(EventTypeId),
}

impl AbilityKind {
    /// Action abilities live in the action list and never listen for events.
    #[must_use]
    pub const fn is_action(self) -> bool {
        matches!(self, AbilityKind::Action)
    }

    /// Event types an ability of this kind listens for.
    #[must_use]
    pub fn listens_for(self) -> SmallVec<[EventTypeId; 2]> {
        match self {
            AbilityKind::Action => SmallVec::new(),
            AbilityKind::Fight => smallvec![events::FIGHT],
            AbilityKind::Reap => smallvec![events::REAP],
            AbilityKind::Play => smallvec![events::PLAY],
            AbilityKind::Triggered(event_type) => smallvec![event_type],
        }
    }
}

/// Properties used to construct an ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityProperties {
    /// Human-readable name (for logs and UI).
    pub name: String,

    /// Uses per activation window. `None` falls back to the engine default.
    pub limit: Option<u32>,

    /// Printed on the card (false for granted abilities).
    pub printed: bool,
}

impl AbilityProperties {
    /// Create properties for a printed ability with the default limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: None,
            printed: true,
        }
    }

    /// Set the use limit (builder pattern).
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Remaining uses of an ability.
///
/// Clones share one counter: a granted ability and its source's
/// `GrantedAbilityLimits` entry hold the same `UseLimit`, so spending a
/// use through either is seen by both. Serializes as the plain count.
#[derive(Clone, Debug, Default)]
pub struct UseLimit(Rc<Cell<u32>>);

impl UseLimit {
    #[must_use]
    pub fn new(uses: u32) -> Self {
        Self(Rc::new(Cell::new(uses)))
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.0.get()
    }

    /// Reset the count (e.g. at the start of a new window).
    pub fn set(&self, uses: u32) {
        self.0.set(uses);
    }

    /// Consume one use. Returns false if none were left.
    pub fn take_one(&self) -> bool {
        match self.0.get() {
            0 => false,
            n => {
                self.0.set(n - 1);
                true
            }
        }
    }

    /// Do both handles count down the same uses?
    #[must_use]
    pub fn is_shared_with(&self, other: &UseLimit) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for UseLimit {
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining()
    }
}

impl Eq for UseLimit {}

impl Serialize for UseLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.remaining())
    }
}

impl<'de> Deserialize<'de> for UseLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(UseLimit::new)
    }
}

/// An ability on a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: AbilityId,
    pub kind: AbilityKind,
    pub name: String,
    pub printed: bool,

    /// Uses left in the current window.
    pub limit: UseLimit,
}

impl Ability {
    #[must_use]
    pub fn remaining_uses(&self) -> u32 {
        self.limit.remaining()
    }

    /// Can the ability still be used?
    #[must_use]
    pub fn can_use(&self) -> bool {
        self.limit.remaining() > 0
    }

    /// Consume one use. Returns false if none were left.
    pub fn use_once(&self) -> bool {
        self.limit.take_one()
    }
}

/// The two ability lists of a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAbilities {
    pub actions: Vec<Ability>,
    pub reactions: Vec<Ability>,
}

impl CardAbilities {
    /// Append an ability to the list matching its kind.
    pub fn push(&mut self, ability: Ability) {
        if ability.kind.is_action() {
            self.actions.push(ability);
        } else {
            self.reactions.push(ability);
        }
    }

    /// Remove an ability by identity, preserving the order of the rest.
    pub fn remove(&mut self, id: AbilityId) -> Option<Ability> {
        for list in [&mut self.actions, &mut self.reactions] {
            if let Some(pos) = list.iter().position(|a| a.id == id) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    /// Find an ability by identity.
    #[must_use]
    pub fn get(&self, id: AbilityId) -> Option<&Ability> {
        self.actions
            .iter()
            .chain(self.reactions.iter())
            .find(|a| a.id == id)
    }

    /// Find an ability by identity, mutably.
    pub fn get_mut(&mut self, id: AbilityId) -> Option<&mut Ability> {
        self.actions
            .iter_mut()
            .chain(self.reactions.iter_mut())
            .find(|a| a.id == id)
    }

    /// Abilities that were granted rather than printed.
    pub fn granted(&self) -> impl Iterator<Item = &Ability> {
        self.actions
            .iter()
            .chain(self.reactions.iter())
            .filter(|a| !a.printed)
    }

    /// Total ability count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len() + self.reactions.len()
    }

    /// Check if the card has no abilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.reactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ability(id: u32, kind: AbilityKind) -> Ability {
        Ability {
            id: AbilityId::new(id),
            kind,
            name: format!("a{}", id),
            printed: true,
            limit: UseLimit::new(1),
        }
    }

    #[test]
    fn test_listens_for() {
        assert!(AbilityKind::Action.listens_for().is_empty());
        assert_eq!(AbilityKind::Reap.listens_for().as_slice(), &[events::REAP]);

        let custom = EventTypeId::new(40);
        assert_eq!(AbilityKind::Triggered(custom).listens_for().as_slice(), &[custom]);
    }

    #[test]
    fn test_push_sorts_by_kind() {
        let mut abilities = CardAbilities::default();
        abilities.push(ability(1, AbilityKind::Action));
        abilities.push(ability(2, AbilityKind::Fight));
        abilities.push(ability(3, AbilityKind::Triggered(EventTypeId::new(9))));

        assert_eq!(abilities.actions.len(), 1);
        assert_eq!(abilities.reactions.len(), 2);
        assert_eq!(abilities.len(), 3);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut abilities = CardAbilities::default();
        for id in 1..=3 {
            abilities.push(ability(id, AbilityKind::Reap));
        }

        let removed = abilities.remove(AbilityId::new(2)).unwrap();
        assert_eq!(removed.id, AbilityId::new(2));

        let ids: Vec<_> = abilities.reactions.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut abilities = CardAbilities::default();
        abilities.push(ability(1, AbilityKind::Action));

        assert!(abilities.remove(AbilityId::new(7)).is_none());
        assert_eq!(abilities.len(), 1);
    }

    #[test]
    fn test_use_once() {
        let reap = ability(1, AbilityKind::Reap);
        assert!(reap.use_once());
        assert!(!reap.can_use());
        assert!(!reap.use_once());
        assert_eq!(reap.remaining_uses(), 0);
    }

    #[test]
    fn test_cloned_limit_shares_uses() {
        let reap = ability(1, AbilityKind::Reap);
        reap.limit.set(2);
        let cache = reap.limit.clone();

        assert!(reap.use_once());
        assert_eq!(cache.remaining(), 1);
        assert!(cache.take_one());
        assert!(!reap.can_use());
        assert!(cache.is_shared_with(&reap.limit));
        assert!(!UseLimit::new(0).is_shared_with(&cache));
    }

    #[test]
    fn test_limit_serializes_as_count() {
        let reap = ability(4, AbilityKind::Reap);
        let json = serde_json::to_string(&reap).unwrap();
        assert!(json.contains("\"limit\":1"));

        let back: Ability = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reap);
        assert!(!back.limit.is_shared_with(&reap.limit));
    }

    #[test]
    fn test_granted_filter() {
        let mut abilities = CardAbilities::default();
        abilities.push(ability(1, AbilityKind::Play));
        let mut granted = ability(2, AbilityKind::Action);
        granted.printed = false;
        abilities.push(granted);

        let ids: Vec<_> = abilities.granted().map(|a| a.id).collect();
        assert_eq!(ids, vec![AbilityId::new(2)]);
    }
}
