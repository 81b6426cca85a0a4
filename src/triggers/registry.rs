//! Listener registry.
//!
//! Reactions (fight, reap, play and triggered abilities) register the
//! event types they listen for here. The host looks listeners up when
//! an event fires; this crate only registers and unregisters them.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cards::AbilityId;
use crate::core::EntityId;

use super::event::EventTypeId;

/// An ability listening for events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listener {
    /// The listening ability.
    pub ability: AbilityId,

    /// The card the ability is on.
    pub card: EntityId,

    /// Event types the ability listens for.
    pub event_types: SmallVec<[EventTypeId; 2]>,
}

/// Registry of event listeners, indexed by event type.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    /// All registered listeners.
    listeners: FxHashMap<AbilityId, Listener>,

    /// Index by event type for fast lookup.
    by_event_type: FxHashMap<EventTypeId, Vec<AbilityId>>,
}

impl ListenerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// Returns false (and changes nothing) if the ability is already
    /// registered, so an ability never hears the same event twice.
    pub fn register(&mut self, listener: Listener) -> bool {
        if self.listeners.contains_key(&listener.ability) {
            return false;
        }

        let id = listener.ability;
        for event_type in &listener.event_types {
            self.by_event_type
                .entry(*event_type)
                .or_default()
                .push(id);
        }

        self.listeners.insert(id, listener);
        true
    }

    /// Unregister an ability's listener. Missing abilities are ignored.
    pub fn unregister(&mut self, ability: AbilityId) -> Option<Listener> {
        let listener = self.listeners.remove(&ability)?;

        let mut empty_types = Vec::new();
        for event_type in &listener.event_types {
            if let Some(list) = self.by_event_type.get_mut(event_type) {
                list.retain(|&id| id != ability);
                if list.is_empty() {
                    empty_types.push(*event_type);
                }
            }
        }
        for event_type in empty_types {
            self.by_event_type.remove(&event_type);
        }

        Some(listener)
    }

    /// Listeners for an event type, in ability ID order.
    pub fn listeners_for(&self, event_type: EventTypeId) -> Vec<&Listener> {
        let Some(ids) = self.by_event_type.get(&event_type) else {
            return Vec::new();
        };

        let mut found: Vec<_> = ids.iter().filter_map(|id| self.listeners.get(id)).collect();
        found.sort_by_key(|l| l.ability);
        found
    }

    /// Listeners registered by abilities on `card`.
    pub fn listeners_on_card(&self, card: EntityId) -> Vec<&Listener> {
        let mut found: Vec<_> = self.listeners.values().filter(|l| l.card == card).collect();
        found.sort_by_key(|l| l.ability);
        found
    }

    /// Is this ability registered?
    #[must_use]
    pub fn contains(&self, ability: AbilityId) -> bool {
        self.listeners.contains_key(&ability)
    }

    /// Get total listener count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
