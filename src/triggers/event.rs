//! Event types.
//!
//! Granted reactions listen for events. Apart from the three event types
//! the built-in ability kinds use, event types are host-defined, opaque
//! identifiers.

use serde::{Deserialize, Serialize};

/// Event type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTypeId(pub u32);

impl EventTypeId {
    /// Create a new event type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventType({})", self.0)
    }
}

/// Event types the built-in ability kinds listen for.
///
/// Hosts should number their own event types above these.
pub mod events {
    use super::EventTypeId;

    /// A creature fought.
    pub const FIGHT: EventTypeId = EventTypeId::new(1);
    /// A creature reaped.
    pub const REAP: EventTypeId = EventTypeId::new(2);
    /// A card was played.
    pub const PLAY: EventTypeId = EventTypeId::new(3);
    /// First free event type for hosts.
    pub const FIRST_HOST_EVENT: u32 = 16;
}
